use opamp_core::error::OpampError;

/// `text/json`, `text/yaml`, and an empty content-type (legacy clients) are
/// the only accepted content-types for an agent config body; everything
/// else is rejected before it reaches `opamp-core`, per "use any at the
/// wire, strong types internally".
pub fn normalize_content_type(raw: Option<&str>) -> Result<String, OpampError> {
    match raw.map(str::trim) {
        None | Some("") => Ok("text/yaml".to_string()),
        Some("text/yaml") => Ok("text/yaml".to_string()),
        Some("text/json") => Ok("text/json".to_string()),
        Some(other) => Err(OpampError::InvalidArgument(format!("unsupported config content-type: {other}"))),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_content_type_defaults_to_yaml() {
        assert_eq!(normalize_content_type(None).unwrap(), "text/yaml");
        assert_eq!(normalize_content_type(Some("")).unwrap(), "text/yaml");
    }

    #[test]
    fn accepts_text_json_and_text_yaml() {
        assert_eq!(normalize_content_type(Some("text/json")).unwrap(), "text/json");
        assert_eq!(normalize_content_type(Some("text/yaml")).unwrap(), "text/yaml");
    }

    #[test]
    fn rejects_anything_else() {
        assert!(normalize_content_type(Some("application/xml")).is_err());
    }
}
