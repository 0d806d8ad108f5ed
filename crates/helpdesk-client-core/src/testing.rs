//! Scripted transport for exercising the flows without a server.

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

#[derive(Debug)]
struct Route {
    method: HttpMethod,
    path: String,
    replies: VecDeque<Result<HttpResponse, TransportError>>,
}

/// Answers requests from per-route queues and records everything it sees.
///
/// Routes match on method and URL path suffix (query ignored). A route with
/// one reply left keeps answering with it; unmatched requests get a JSON 404.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: RefCell<Vec<Route>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: HttpMethod, path: &str, response: HttpResponse) -> &Self {
        self.push(method, path, Ok(response));
        self
    }

    pub fn respond_json(
        &self,
        method: HttpMethod,
        path: &str,
        status: u16,
        body: &serde_json::Value,
    ) -> &Self {
        self.respond(method, path, HttpResponse::json(status, body.to_string()))
    }

    pub fn fail(&self, method: HttpMethod, path: &str, message: &str) -> &Self {
        self.push(method, path, Err(TransportError::new(message)));
        self
    }

    /// Drops every scripted reply for the route so the next script starts fresh.
    pub fn reset_route(&self, method: HttpMethod, path: &str) {
        self.routes
            .borrow_mut()
            .retain(|route| !(route.method == method && route.path == path));
    }

    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    #[must_use]
    pub fn requests_to(&self, method: HttpMethod, path: &str) -> Vec<HttpRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|request| request.method == method && path_matches(&request.url, path))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.requests_to(method, path).len()
    }

    pub fn clear_requests(&self) {
        self.requests.borrow_mut().clear();
    }

    fn push(&self, method: HttpMethod, path: &str, reply: Result<HttpResponse, TransportError>) {
        let mut routes = self.routes.borrow_mut();
        if let Some(route) = routes
            .iter_mut()
            .find(|route| route.method == method && route.path == path)
        {
            route.replies.push_back(reply);
            return;
        }
        routes.push(Route {
            method,
            path: path.to_string(),
            replies: VecDeque::from([reply]),
        });
    }

    fn next_reply(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut routes = self.routes.borrow_mut();
        let Some(route) = routes
            .iter_mut()
            .filter(|route| route.method == request.method && path_matches(&request.url, &route.path))
            .max_by_key(|route| route.path.len())
        else {
            return Ok(HttpResponse::json(404, r#"{"detail":"Not found."}"#));
        };
        if route.replies.len() > 1 {
            if let Some(reply) = route.replies.pop_front() {
                return reply;
            }
        }
        route
            .replies
            .front()
            .cloned()
            .unwrap_or_else(|| Ok(HttpResponse::json(404, r#"{"detail":"Not found."}"#)))
    }
}

#[async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        self.next_reply(request)
    }
}

fn path_matches(url: &str, path: &str) -> bool {
    let without_query = url.split_once('?').map_or(url, |(head, _)| head);
    without_query.ends_with(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_queue_then_sticks_on_last_reply() {
        let transport = MockTransport::new();
        transport
            .respond(HttpMethod::Get, "/my-tickets/", HttpResponse::json(401, "{}"))
            .respond(HttpMethod::Get, "/my-tickets/", HttpResponse::json(200, "[]"));

        let request = HttpRequest::get("http://localhost/api/v1/my-tickets/?status=open");
        let statuses = [
            transport.send(&request).await.expect("first").status,
            transport.send(&request).await.expect("second").status,
            transport.send(&request).await.expect("third").status,
        ];
        assert_eq!(statuses, [401, 200, 200]);
        assert_eq!(transport.count(HttpMethod::Get, "/my-tickets/"), 3);
    }

    #[tokio::test]
    async fn unmatched_routes_are_not_found() {
        let transport = MockTransport::new();
        let response = transport
            .send(&HttpRequest::delete("http://localhost/api/v1/tickets/1/"))
            .await
            .expect("response");
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn longest_suffix_wins() {
        let transport = MockTransport::new();
        transport
            .respond(HttpMethod::Get, "/", HttpResponse::text(200, "root"))
            .respond(HttpMethod::Get, "/tickets/t-1/", HttpResponse::text(200, "ticket"));
        let response = transport
            .send(&HttpRequest::get("http://localhost/api/v1/tickets/t-1/"))
            .await
            .expect("response");
        assert_eq!(response.body, "ticket");
    }
}
