//! Handler-level tests and shared test helpers.


use std::net::SocketAddr;

/// Serve `app` on an ephemeral local port, standing in for the RAG service.
pub(crate) async fn spawn_downstream(app: axum::Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind downstream");
    let addr = listener.local_addr().expect("downstream addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("downstream server");
    });

    addr
}
