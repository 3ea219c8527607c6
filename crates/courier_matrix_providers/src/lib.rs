pub mod as_the_crow_flies;
pub mod error;
pub mod osrm;
pub mod route_geometry;
pub mod travel_matrices;
pub mod travel_matrix_client;
pub mod travel_matrix_provider;
