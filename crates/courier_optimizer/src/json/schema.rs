use schemars::schema_for;

use crate::json::types;

pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(types::OptimizationRequest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_request_fields() {
        let schema = generate_json_schema().unwrap();

        assert!(schema.contains("vehicle_count"));
        assert!(schema.contains("use_capacity"));
        assert!(schema.contains("time_start"));
    }
}
