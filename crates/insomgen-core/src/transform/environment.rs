use crate::context::{EntityKind, GenerationContext};
use crate::export::{
    BASE_ENVIRONMENT_NAME, BASE_URL_TEMPLATE, BaseEnvironmentData, Environments, Meta,
    SubEnvironment, SubEnvironmentData,
};
use crate::parse::document::Server;

const BASE_CREATED_OFFSET: i64 = -7;
const BASE_MODIFIED_OFFSET: i64 = 8;
const FIRST_SUB_ENVIRONMENT_OFFSET: i64 = 9;

/// Scheme, host and base path of a server URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerParts {
    pub scheme: String,
    pub host: String,
    pub base_path: String,
}

/// Split a server URL. Without an `http://` or `https://` prefix the scheme
/// defaults to `http` and the whole text is treated as host plus path.
pub fn parse_server_url(url: &str) -> ServerParts {
    let (scheme, rest) = if let Some(rest) = url.strip_prefix("https://") {
        ("https", rest)
    } else if let Some(rest) = url.strip_prefix("http://") {
        ("http", rest)
    } else {
        ("http", url)
    };

    let (host, base_path) = match rest.split_once('/') {
        Some((host, path)) => (host.to_string(), format!("/{path}")),
        None => (rest.to_string(), String::new()),
    };

    ServerParts {
        scheme: scheme.to_string(),
        host,
        base_path,
    }
}

/// Build the base environment and one sub-environment per server, keeping
/// declaration order through increasing sort keys.
pub fn build_environments(servers: &[Server], ctx: &GenerationContext) -> Environments {
    let base_id = ctx.id(EntityKind::Environment);

    let sub_environments = servers
        .iter()
        .zip(FIRST_SUB_ENVIRONMENT_OFFSET..)
        .map(|(server, offset)| {
            let parts = parse_server_url(&server.url);
            let sort_key = ctx.at(offset);
            SubEnvironment {
                name: format!("OpenAPI env {}", parts.host),
                meta: Meta {
                    id: ctx.id(EntityKind::Environment),
                    created: sort_key,
                    modified: sort_key,
                    sort_key,
                    ..Meta::default()
                },
                data: SubEnvironmentData {
                    scheme: parts.scheme,
                    base_path: parts.base_path,
                    host: parts.host,
                },
            }
        })
        .collect();

    Environments {
        name: BASE_ENVIRONMENT_NAME.to_string(),
        meta: Meta {
            id: base_id,
            created: ctx.at(BASE_CREATED_OFFSET),
            modified: ctx.at(BASE_MODIFIED_OFFSET),
            ..Meta::default()
        },
        data: BaseEnvironmentData {
            base_url: BASE_URL_TEMPLATE.to_string(),
        },
        sub_environments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::CountingSource;

    fn server(url: &str) -> Server {
        Server {
            url: url.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_parse_https_with_path() {
        let parts = parse_server_url("https://api.example.com/v2");
        assert_eq!(parts.scheme, "https");
        assert_eq!(parts.host, "api.example.com");
        assert_eq!(parts.base_path, "/v2");
    }

    #[test]
    fn test_parse_bare_host() {
        let parts = parse_server_url("example.com");
        assert_eq!(parts.scheme, "http");
        assert_eq!(parts.host, "example.com");
        assert_eq!(parts.base_path, "");
    }

    #[test]
    fn test_parse_http_with_port_and_nested_path() {
        let parts = parse_server_url("http://localhost:8080/api/v1");
        assert_eq!(parts.scheme, "http");
        assert_eq!(parts.host, "localhost:8080");
        assert_eq!(parts.base_path, "/api/v1");
    }

    #[test]
    fn test_parse_relative_url() {
        let parts = parse_server_url("/v1");
        assert_eq!(parts.scheme, "http");
        assert_eq!(parts.host, "");
        assert_eq!(parts.base_path, "/v1");
    }

    #[test]
    fn test_sub_environments_follow_declaration_order() {
        let ctx = GenerationContext::with_source(1_000, Box::new(CountingSource::default()));
        let env = build_environments(
            &[server("https://prod.example.com/v1"), server("http://localhost:3000")],
            &ctx,
        );

        assert_eq!(env.name, "Base Environment");
        assert_eq!(env.data.base_url, "{{ _.scheme }}://{{ _.host }}{{ _.base_path }}");
        assert_eq!(env.meta.created, 993);
        assert_eq!(env.meta.modified, 1_008);

        let subs = &env.sub_environments;
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].name, "OpenAPI env prod.example.com");
        assert_eq!(subs[0].meta.sort_key, 1_009);
        assert_eq!(subs[1].name, "OpenAPI env localhost:3000");
        assert_eq!(subs[1].meta.sort_key, 1_010);
        assert_eq!(subs[1].meta.created, subs[1].meta.sort_key);
        assert!(subs[0].meta.id.starts_with("env_"));
        assert_ne!(subs[0].meta.id, env.meta.id);
    }

    #[test]
    fn test_no_servers() {
        let ctx = GenerationContext::with_source(1_000, Box::new(CountingSource::default()));
        let env = build_environments(&[], &ctx);
        assert!(env.sub_environments.is_empty());
    }
}
