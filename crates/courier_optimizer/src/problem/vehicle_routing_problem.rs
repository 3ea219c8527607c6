use crate::solver::error::SolverError;

use super::{
    capacity::Capacity,
    job::{DEPOT, Job, NodeIdx},
    model_params::ModelParams,
    node_index::NodeIndexMap,
    time_window::Minutes,
    travel_matrices::{Distance, TravelMatrices},
    vehicle::{Vehicle, VehicleIdx},
};

/// Immutable description of one optimization request: the depot and its jobs,
/// a homogeneous fleet and the travel matrices between every pair of nodes.
///
/// Node 0 is the depot. Every other node is a job that must be served exactly
/// once.
#[derive(Clone)]
pub struct VehicleRoutingProblem {
    jobs: Vec<Job>,
    vehicles: Vec<Vehicle>,
    matrices: TravelMatrices,
    node_index: NodeIndexMap,
    open_path: bool,
    params: ModelParams,
    has_time_windows: bool,
}

impl VehicleRoutingProblem {
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job(&self, node: NodeIdx) -> &Job {
        &self.jobs[node]
    }

    pub fn depot(&self) -> &Job {
        &self.jobs[DEPOT]
    }

    /// Every node except the depot.
    pub fn customers(&self) -> impl DoubleEndedIterator<Item = NodeIdx> + ExactSizeIterator + Clone {
        NodeIdx::range(self.jobs.len()).skip(1)
    }

    pub fn num_customers(&self) -> usize {
        self.jobs.len() - 1
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> &Vehicle {
        &self.vehicles[vehicle_id]
    }

    pub fn matrices(&self) -> &TravelMatrices {
        &self.matrices
    }

    #[inline]
    pub fn distance(&self, from: NodeIdx, to: NodeIdx) -> Distance {
        self.matrices.distance(from, to)
    }

    #[inline]
    pub fn duration(&self, from: NodeIdx, to: NodeIdx) -> Minutes {
        self.matrices.duration(from, to)
    }

    #[inline]
    pub fn demand(&self, node: NodeIdx) -> u64 {
        if node.is_depot() {
            0
        } else {
            self.jobs[node].demand() as u64
        }
    }

    /// Vehicles end their route at the last job instead of driving back.
    pub fn is_open_path(&self) -> bool {
        self.open_path
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn has_time_windows(&self) -> bool {
        self.has_time_windows
    }

    pub fn has_span_cost(&self) -> bool {
        self.params.span_cost_coefficient > 0.0 && self.vehicles.len() > 1
    }

    /// True when the objective is exactly the sum of arc costs.
    pub fn is_pure_arc_cost(&self) -> bool {
        !self.has_time_windows && !self.has_span_cost()
    }

    pub fn external_id(&self, node: NodeIdx) -> i64 {
        self.node_index.external_id(node)
    }
}

#[derive(Default)]
pub struct VehicleRoutingProblemBuilder {
    jobs: Option<Vec<Job>>,
    vehicles: Option<Vec<Vehicle>>,
    matrices: Option<TravelMatrices>,
    open_path: bool,
    params: Option<ModelParams>,
}

impl VehicleRoutingProblemBuilder {
    /// The first job is the depot.
    pub fn set_jobs(&mut self, jobs: Vec<Job>) -> &mut VehicleRoutingProblemBuilder {
        self.jobs = Some(jobs);
        self
    }

    pub fn set_vehicles(&mut self, vehicles: Vec<Vehicle>) -> &mut VehicleRoutingProblemBuilder {
        self.vehicles = Some(vehicles);
        self
    }

    /// `vehicle_count` identical vehicles leaving the depot at the configured
    /// departure time.
    pub fn set_fleet(
        &mut self,
        vehicle_count: usize,
        capacity: Capacity,
        departure: Minutes,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.vehicles = Some(vec![Vehicle::new(capacity, departure); vehicle_count]);
        self
    }

    pub fn set_matrices(&mut self, matrices: TravelMatrices) -> &mut VehicleRoutingProblemBuilder {
        self.matrices = Some(matrices);
        self
    }

    pub fn set_open_path(&mut self, open_path: bool) -> &mut VehicleRoutingProblemBuilder {
        self.open_path = open_path;
        self
    }

    pub fn set_params(&mut self, params: ModelParams) -> &mut VehicleRoutingProblemBuilder {
        self.params = Some(params);
        self
    }

    pub fn build(self) -> Result<VehicleRoutingProblem, SolverError> {
        let jobs = self.jobs.unwrap_or_default();
        if jobs.is_empty() {
            return Err(SolverError::InvalidProblem(
                "at least the depot is required".to_string(),
            ));
        }

        let vehicles = self.vehicles.unwrap_or_default();
        if vehicles.is_empty() {
            return Err(SolverError::InvalidProblem(
                "at least one vehicle is required".to_string(),
            ));
        }

        let matrices = self
            .matrices
            .ok_or_else(|| SolverError::InvalidProblem("missing travel matrices".to_string()))?;

        if matrices.num_nodes() != jobs.len() {
            return Err(SolverError::InvalidProblem(format!(
                "travel matrices cover {} nodes but the problem has {}",
                matrices.num_nodes(),
                jobs.len()
            )));
        }

        let node_index = NodeIndexMap::new(&jobs)?;

        Ok(VehicleRoutingProblem {
            has_time_windows: jobs.iter().skip(1).any(|job| job.has_time_window()),
            jobs,
            vehicles,
            matrices,
            node_index,
            open_path: self.open_path,
            params: self.params.unwrap_or_default(),
        })
    }
}
