use std::net::SocketAddr;

use actix_web::{web::ServiceConfig, App, HttpServer};

/// HTTP server standing in for a remote API during a test.
/// It runs until the test's actix system stops.
pub struct StubServer {
    addr: SocketAddr,
}

impl StubServer {
    /// Starts a server on a random local port with the routes set by `routes`.
    /// Must be called from within an actix runtime, e.g. `#[actix_web::test]`.
    pub fn start<F>(routes: F) -> StubServer
    where
        F: Fn(&mut ServiceConfig) + Clone + Send + 'static,
    {
        let server = HttpServer::new(move || App::new().configure(routes.clone()))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .unwrap_or_else(|e| panic!("Failed to start stub server cause: {e:?}"));

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        StubServer { addr }
    }

    /// e.g. `http://127.0.0.1:43121`
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn host(&self) -> String {
        format!("http://{}", self.addr.ip())
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}
