use axum::body::to_bytes;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Логирует каждый HTTP запрос через `tracing`
///
/// Поля записи: `status`, `elapsed_ms`, `size_bytes`; в сообщении метод и путь.
/// Ответы не 2xx пишутся уровнем WARN.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();
    let status = parts.status.as_u16();

    // Тело буферизуется, чтобы узнать реальный размер
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                status,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "{} {} body read failed: {}",
                method,
                path,
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let size_bytes = bytes.len();
    if parts.status.is_success() {
        tracing::info!(status, elapsed_ms, size_bytes, "{} {}", method, path);
    } else {
        tracing::warn!(status, elapsed_ms, size_bytes, "{} {}", method, path);
    }

    Response::from_parts(parts, Body::from(bytes))
}
