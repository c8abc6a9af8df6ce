use httpmock::prelude::*;
use httpmock::{
    Mock,
    Then,
    When,
};
use serde_json::json;

type Handler = Box<dyn Fn(When, Then)>;

// Wraps an httpmock server that pretends to be the apiserver.  Each handler is registered with
// the number of requests it expects to see; `None` means "any number", which is what the polling
// tests need since the number of attempts depends on wall-clock timing.
pub struct MockServerBuilder {
    server: MockServer,
    handlers: Vec<(Handler, Option<usize>)>,
    mock_ids: Vec<(usize, Option<usize>)>,
}

fn print_req(req: &HttpMockRequest) -> bool {
    // Use println instead of info! so that this works outside of the lib crate
    println!("    Received: {} {}", req.method_str(), req.uri_str());
    true
}

impl MockServerBuilder {
    pub fn new() -> MockServerBuilder {
        MockServerBuilder {
            server: MockServer::start(),
            handlers: vec![],
            mock_ids: vec![],
        }
    }

    pub fn assert(&self) {
        for (id, hits) in &self.mock_ids {
            if let Some(n) = hits {
                println!("checking assertions for mock {id}");
                Mock::new(*id, &self.server).assert_hits(*n);
            }
        }
    }

    pub fn handle<F: Fn(When, Then) + 'static>(&mut self, f: F) -> &mut Self {
        self.handle_multiple(1, f)
    }

    pub fn handle_multiple<F: Fn(When, Then) + 'static>(&mut self, hits: usize, f: F) -> &mut Self {
        self.push_handler(Some(hits), f)
    }

    pub fn handle_repeated<F: Fn(When, Then) + 'static>(&mut self, f: F) -> &mut Self {
        self.push_handler(None, f)
    }

    pub fn handle_not_found(&mut self, path: String) -> &mut Self {
        self.handle(move |when, then| {
            when.path(&path);
            then.status(404).json_body(status_not_found());
        })
    }

    pub fn build(&mut self) {
        for (f, hits) in self.handlers.iter() {
            self.mock_ids.push((self.server.mock(f).id, *hits));
        }

        // Print all unmatched/unhandled requests for easier debugging;
        // this has to go last so that the other mock rules have a chance
        // to match first
        self.server.mock(|when, _| {
            when.matches(print_req);
        });
    }

    pub fn url(&self) -> http::Uri {
        http::Uri::try_from(self.server.url("/")).unwrap()
    }

    fn push_handler<F: Fn(When, Then) + 'static>(&mut self, hits: Option<usize>, f: F) -> &mut Self {
        self.handlers.push((
            Box::new(move |w, t| {
                let w = w.matches(print_req);
                f(w, t);
            }),
            hits,
        ));
        self
    }
}

impl Default for MockServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn make_fake_apiserver() -> (MockServerBuilder, kube::Client) {
    let builder = MockServerBuilder::new();
    let config = kube::Config::new(builder.url());
    let client = kube::Client::try_from(config).unwrap();
    (builder, client)
}

pub fn status_not_found() -> serde_json::Value {
    json!({
      "kind": "Status",
      "apiVersion": "v1",
      "metadata": {},
      "status": "Failure",
      "reason": "NotFound",
      "code": 404
    })
}

pub fn status_conflict() -> serde_json::Value {
    json!({
      "kind": "Status",
      "apiVersion": "v1",
      "metadata": {},
      "status": "Failure",
      "message": "the object has been modified; please apply your changes to the latest version and try again",
      "reason": "Conflict",
      "code": 409
    })
}
