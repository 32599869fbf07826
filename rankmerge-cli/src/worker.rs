/// Edge worker script templating for `rotate-token`.
///
/// The worker forwards public CDN requests to the storage bucket, attaching
/// the download token as an Authorization header.
use std::path::Path;

use crate::bail;

pub const TOKEN_PLACEHOLDER: &str = "$download_token";
pub const HOST_PLACEHOLDER: &str = "$public_host";
pub const BUCKET_PLACEHOLDER: &str = "$bucket_name";

pub const DEFAULT_TEMPLATE: &str = r#"addEventListener('fetch', event => {
    event.respondWith(handleRequest(event.request))
})
async function handleRequest(request) {
let authToken='$download_token'
let b2Headers = new Headers(request.headers)
b2Headers.append("Authorization", authToken)
modRequest = new Request(request.url.replace("$public_host/", "$public_host/file/$bucket_name/"), {
    method: request.method,
    headers: b2Headers
})
const response = await fetch(modRequest)
return response
}"#;

/// Values substituted into a worker template.
pub struct WorkerVars<'a> {
    pub download_token: &'a str,
    pub public_host: Option<&'a str>,
    pub bucket_name: Option<&'a str>,
}

/// Load a custom template. It must contain `$download_token`.
pub fn load_template(path: &Path) -> String {
    let template = std::fs::read_to_string(path)
        .unwrap_or_else(|e| bail(format!("Failed to read worker template {}: {e}", path.display())));
    if !template.contains(TOKEN_PLACEHOLDER) {
        bail(format!(
            "Worker template {} does not contain {TOKEN_PLACEHOLDER}",
            path.display()
        ));
    }
    template
}

/// Fill in a template. Fails if the template uses a placeholder that has no
/// value.
pub fn render(template: &str, vars: &WorkerVars) -> Result<String, String> {
    let mut script = template.replace(TOKEN_PLACEHOLDER, vars.download_token);

    for (placeholder, value, key) in [
        (HOST_PLACEHOLDER, vars.public_host, "public_host"),
        (BUCKET_PLACEHOLDER, vars.bucket_name, "bucket_name"),
    ] {
        if !script.contains(placeholder) {
            continue;
        }
        match value {
            Some(v) => script = script.replace(placeholder, v),
            None => {
                return Err(format!(
                    "Worker template uses {placeholder} but no {key} is set. Pass --{} or set it under [rotate] in the config.",
                    key.replace('_', "-")
                ));
            }
        }
    }

    Ok(script)
}
