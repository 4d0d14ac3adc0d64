pub mod backends;
pub mod models;

/// Make a span for an incoming request with the default fields every handler
/// span should carry. Extra fields to be recorded later (such as path
/// parameters) have to be declared here as [`tracing::field::Empty`].
#[macro_export]
macro_rules! request_span {
    ($request:expr, $($field:tt)*) => {
        {
            let path = if let Some(path) = $request
                .extensions()
                .get::<axum::extract::MatchedPath>()
            {
                path.as_str()
            } else {
                ""
            };

            tracing::debug_span!(
                "request",
                http.uri = %$request.uri(),
                http.method = %$request.method(),
                http.status_code = tracing::field::Empty,
                request.path = path,
                $($field)*
            )
        }
    };
    ($request:expr) => {
        $crate::request_span!($request, )
    };
}
