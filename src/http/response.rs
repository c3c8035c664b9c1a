//! HTTP response building module
//!
//! Builders for the status pages and file responses the router emits.
//! Error bodies are fixed minimal HTML documents naming the server; no
//! internal paths ever reach the client.

use crate::http::body::ResponseBody;
use hyper::Response;

/// Build 200 response for a generated HTML page
pub fn build_html_response(content: String) -> Response<ResponseBody> {
    let content_length = content.len();
    Response::builder()
        .status(200)
        .header("Content-Type", "text/html")
        .header("Content-Length", content_length)
        .body(ResponseBody::once(content))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(ResponseBody::empty())
        })
}

/// Build 200 response for a file body (buffered or streamed)
pub fn build_file_response(
    body: ResponseBody,
    content_type: &str,
    content_length: u64,
) -> Response<ResponseBody> {
    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(ResponseBody::empty())
        })
}

/// Build 404 Not Found response with the fixed HTML body
pub fn build_not_found_response(server_name: &str) -> Response<ResponseBody> {
    let body = format!(
        "<!DOCTYPE HTML PUBLIC \"-//IETF//DTD HTML 2.0//EN\">\n\
         <html><head>\n\
         <title>404 Not Found</title>\n\
         </head><body>\n\
         <h1>Not Found</h1>\n\
         <p>The requested URL was not found on this server.</p>\n\
         <hr>\n\
         <address>{server_name}</address>\n\
         </body></html>\n"
    );
    let content_length = body.len();
    Response::builder()
        .status(404)
        .header("Content-Type", "text/html")
        .header("Content-Length", content_length)
        .body(ResponseBody::once(body))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(ResponseBody::empty())
        })
}

/// Build 500 Internal Server Error response with the fixed HTML body
pub fn build_server_error_response(server_name: &str) -> Response<ResponseBody> {
    let body = format!(
        "<!DOCTYPE HTML PUBLIC \"-//IETF//DTD HTML 2.0//EN\">\n\
         <html><head>\n\
         <title>500 Internal Server Error</title>\n\
         </head><body>\n\
         <h1>Internal Server Error</h1>\n\
         <hr>\n\
         <address>{server_name}</address>\n\
         </body></html>\n"
    );
    let content_length = body.len();
    Response::builder()
        .status(500)
        .header("Content-Type", "text/html")
        .header("Content-Length", content_length)
        .body(ResponseBody::once(body))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(ResponseBody::empty())
        })
}

/// Build the short page returned on the operator shutdown URI
pub fn build_shutdown_response(server_name: &str) -> Response<ResponseBody> {
    let body = format!(
        "<html><head><title>Shutting down</title></head>\
         <body><h1>Server is shutting down</h1><hr>\
         <address>{server_name}</address></body></html>\n"
    );
    build_html_response(body)
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_shape() {
        let resp = build_not_found_response("staticd web server");
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers()["Content-Type"], "text/html");
        assert!(resp.headers().contains_key("Content-Length"));
    }

    #[test]
    fn test_server_error_shape() {
        let resp = build_server_error_response("staticd web server");
        assert_eq!(resp.status(), 500);
        assert_eq!(resp.headers()["Content-Type"], "text/html");
    }

    #[test]
    fn test_file_response_headers() {
        let resp = build_file_response(ResponseBody::once("abc"), "text/plain", 3);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/plain");
        assert_eq!(resp.headers()["Content-Length"], "3");
    }
}
