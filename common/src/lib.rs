use validator::ValidationErrors;

/// Flattens a `ValidationErrors` tree into a single "; "-separated string of
/// the human-readable messages, for use in API error responses.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect::<Vec<_>>()
        .join("; ")
}
