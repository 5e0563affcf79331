use crate::parse::operation::Parameter;

/// Client variable every request URL starts with.
pub const BASE_URL_VARIABLE: &str = "{{ _.base_url }}";

/// Rewrite `{name}` placeholders of path parameters into `{{ _.name }}`
/// client variables and prefix the base URL variable.
///
/// Parameters without a name or location are skipped, as are parameters that
/// do not live in the path.
pub fn build_url(path: &str, parameters: &[Parameter]) -> String {
    let mut url = path.to_string();
    for param in parameters.iter().filter(|p| p.is_path()) {
        let Some(ref name) = param.name else {
            continue;
        };
        url = url.replace(&format!("{{{name}}}"), &format!("{{{{ _.{name} }}}}"));
    }
    format!("{BASE_URL_VARIABLE}{url}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, location: &str) -> Parameter {
        Parameter {
            name: Some(name.to_string()),
            location: Some(location.to_string()),
        }
    }

    #[test]
    fn test_path_parameters_become_variables() {
        let params = vec![param("id", "path"), param("orderId", "path")];
        assert_eq!(
            build_url("/users/{id}/orders/{orderId}", &params),
            "{{ _.base_url }}/users/{{ _.id }}/orders/{{ _.orderId }}"
        );
    }

    #[test]
    fn test_query_parameters_are_left_alone() {
        let params = vec![param("id", "query")];
        assert_eq!(build_url("/users/{id}", &params), "{{ _.base_url }}/users/{id}");
    }

    #[test]
    fn test_incomplete_parameters_are_skipped() {
        let params = vec![
            Parameter {
                name: None,
                location: Some("path".to_string()),
            },
            Parameter {
                name: Some("id".to_string()),
                location: None,
            },
        ];
        assert_eq!(build_url("/users/{id}", &params), "{{ _.base_url }}/users/{id}");
    }

    #[test]
    fn test_no_parameters() {
        assert_eq!(build_url("/health", &[]), "{{ _.base_url }}/health");
    }

    #[test]
    fn test_repeated_placeholder() {
        let params = vec![param("v", "path")];
        assert_eq!(build_url("/{v}/x/{v}", &params), "{{ _.base_url }}/{{ _.v }}/x/{{ _.v }}");
    }
}
