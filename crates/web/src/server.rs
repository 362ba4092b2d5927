use crate::api::{dispatch, ApiReply};
use anyhow::anyhow;
use log::{error, info, warn};
use std::sync::Arc;
use std::thread;
use taskdraw_core::Store;
use taskdraw_data::AppConfig;
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Binds the configured address and serves until every worker exits.
pub fn serve(config: &AppConfig, store: Arc<dyn Store>) -> anyhow::Result<()> {
    let server = Server::http(config.bind.as_str())
        .map_err(|err| anyhow!("bind {}: {err}", config.bind))?;
    let server = Arc::new(server);
    info!(
        "task draw server on http://{} ({} workers)",
        config.bind, config.workers
    );
    let mut handles = Vec::with_capacity(config.workers);
    for worker in 0..config.workers {
        let server = Arc::clone(&server);
        let store = Arc::clone(&store);
        let handle = thread::Builder::new()
            .name(format!("http-{worker}"))
            .spawn(move || worker_loop(&server, store.as_ref()))?;
        handles.push(handle);
    }
    for handle in handles {
        if handle.join().is_err() {
            error!("worker thread panicked");
        }
    }
    Ok(())
}

fn worker_loop(server: &Server, store: &dyn Store) {
    loop {
        match server.recv() {
            Ok(request) => {
                if let Err(err) = handle_request(request, store) {
                    warn!("request error: {err}");
                }
            }
            Err(err) => {
                error!("accept failed: {err}");
                break;
            }
        }
    }
}

fn handle_request(
    mut request: Request,
    store: &dyn Store,
) -> Result<(), Box<dyn std::error::Error>> {
    let method = request.method().clone();
    let url = request.url().to_string();
    let mut body = String::new();
    let reply = match request.as_reader().read_to_string(&mut body) {
        Ok(_) => dispatch(store, &method, &url, &body),
        Err(err) => ApiReply {
            status: 400,
            body: serde_json::json!({ "message": format!("unreadable body: {err}") }),
        },
    };
    info!("{method} {url} -> {}", reply.status);
    respond_json(request, reply)
}

fn respond_json(request: Request, reply: ApiReply) -> Result<(), Box<dyn std::error::Error>> {
    let body = serde_json::to_vec(&reply.body)?;
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| "invalid content type header")?;
    let response = Response::from_data(body)
        .with_status_code(StatusCode(reply.status))
        .with_header(header);
    request.respond(response)?;
    Ok(())
}
