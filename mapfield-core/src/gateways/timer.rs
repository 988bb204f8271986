use std::{future::Future, time::Duration};

pub trait Timer {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}
