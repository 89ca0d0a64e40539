pub const CONSENT_KEY: &str = "cookie-consent";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsentChoice {
    Accepted,
    Rejected,
}

impl ConsentChoice {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim() {
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn allows_analytics(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

#[cfg(target_arch = "wasm32")]
pub use storage::{persist_consent, read_stored_consent};

#[cfg(target_arch = "wasm32")]
mod storage {
    use super::{ConsentChoice, CONSENT_KEY};
    use web_sys::{window, Storage};

    fn local_storage() -> Option<Storage> {
        window()?.local_storage().ok().flatten()
    }

    pub fn read_stored_consent() -> Option<ConsentChoice> {
        let value = local_storage()?.get_item(CONSENT_KEY).ok().flatten()?;
        ConsentChoice::from_str(&value)
    }

    pub fn persist_consent(choice: ConsentChoice) {
        match local_storage() {
            Some(storage) => {
                if storage.set_item(CONSENT_KEY, choice.as_str()).is_err() {
                    log::warn!("could not persist cookie consent");
                }
            }
            None => log::warn!("local storage unavailable, consent kept for this visit only"),
        }
    }
}
