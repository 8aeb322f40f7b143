//! Unit tests for publish validation

#[cfg(test)]
mod tests {
    use crate::validation::RawPublishInput;
    use std::collections::HashMap;

    fn base_input() -> RawPublishInput {
        RawPublishInput {
            job_type: "email".to_string(),
            payload: HashMap::new(),
            priority: None,
            max_attempts: None,
            scheduled_for: None,
            trace_id: None,
        }
    }

    #[test]
    fn test_validate_type_empty() {
        let mut input = base_input();
        input.job_type = "".to_string();

        let result = input.validate();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().field, "type");
    }

    #[test]
    fn test_validate_type_too_long() {
        let mut input = base_input();
        input.job_type = "a".repeat(200);

        let result = input.validate();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().field, "type");
    }

    #[test]
    fn test_validate_trace_id_empty_when_provided() {
        let mut input = base_input();
        input.trace_id = Some("".to_string());

        let result = input.validate();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().field, "trace_id");
    }

    #[test]
    fn test_validate_max_attempts_zero() {
        let mut input = base_input();
        input.max_attempts = Some(0);

        let result = input.validate();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().field, "max_attempts");
    }

    #[test]
    fn test_validate_defaults_applied() {
        let input = base_input();
        let validated = input.validate().unwrap();

        assert_eq!(validated.priority, 0);
        assert_eq!(validated.max_attempts, 3);
    }

    #[test]
    fn test_validate_payload_too_deep() {
        use serde_json::json;

        let mut value = json!("leaf");
        for _ in 0..40 {
            value = json!([value]);
        }
        let mut input = base_input();
        input.payload.insert("nested".to_string(), value);

        let result = input.validate();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().field, "payload");
    }
}
