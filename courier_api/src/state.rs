use courier_matrix_providers::travel_matrix_client::TravelMatrixClient;
use courier_optimizer::json::optimize::OptimizeDefaults;

pub struct AppState {
    pub matrix_client: TravelMatrixClient,
    pub defaults: OptimizeDefaults,
}
