use tokio::sync::watch;

use crate::usecase::contracts::LoginRedirect;

/// Login redirect that front ends observe through a watch channel. The value
/// is the number of redirects requested so far.
pub struct RedirectSignal {
    tx: watch::Sender<u64>,
}

impl RedirectSignal {
    pub fn new() -> Self {
        Self {
            tx: watch::Sender::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }

    pub fn count(&self) -> u64 {
        *self.tx.borrow()
    }
}

impl Default for RedirectSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginRedirect for RedirectSignal {
    fn redirect_to_login(&self) {
        tracing::info!("redirecting to login");
        self.tx.send_modify(|count| *count += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_see_redirects() {
        let signal = RedirectSignal::new();
        let mut rx = signal.subscribe();

        signal.redirect_to_login();

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 1);
        assert_eq!(signal.count(), 1);
    }
}
