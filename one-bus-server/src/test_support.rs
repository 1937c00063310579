//! Helpers for tests that need a stand-in OneBusAway server.

use axum::Router;

/// Serve `router` on an ephemeral local port; returns `http://127.0.0.1:PORT`.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// An `arrivals-and-departures-for-stop` body with the given
/// `(routeShortName, predictedArrivalTime)` pairs.
pub fn arrivals_body(arrivals: &[(&str, i64)]) -> String {
    let entries: Vec<serde_json::Value> = arrivals
        .iter()
        .map(|(route, predicted)| {
            serde_json::json!({
                "routeShortName": route,
                "predictedArrivalTime": predicted,
                "scheduledArrivalTime": predicted,
            })
        })
        .collect();

    serde_json::json!({
        "code": 200,
        "text": "OK",
        "version": 2,
        "data": {
            "entry": {
                "stopId": "1_123",
                "arrivalsAndDepartures": entries,
            },
            "references": {},
        },
    })
    .to_string()
}
