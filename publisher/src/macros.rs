/// Builds a [`Listener`](crate::Listener) that forwards every event to `handler.method(id, event)`.
///
/// `handler` must be cheap to clone (usually an `Arc`).
#[macro_export]
macro_rules! listener {
    ($handler:ident.$method:ident) => {
        $crate::Listener::new({
            let handler = $handler.clone();
            move |id, value| {
                handler.$method(id, value);
            }
        })
    };
}
