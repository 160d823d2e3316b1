/// An externally exposed server-like resource the validator runs alongside
/// its loop. Halted on shutdown, including manual interruption.
pub trait IServedEndpoint: Send + Sync {
    fn stop(&self);

    fn describe(&self) -> String {
        "endpoint".to_string()
    }
}
