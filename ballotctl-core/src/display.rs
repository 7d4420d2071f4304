//! Display collaborator contract

use tokio::sync::watch;

use crate::error::Result;
use crate::view::DisplayProps;

/// Something that can present a title, a loading indicator and a list of
/// ballots. The view only promises the shape of [`DisplayProps`]; layout is
/// entirely up to the implementation.
pub trait DisplayCampaigns {
    fn render(&mut self, props: &DisplayProps) -> Result<()>;
}

/// Collects every render, in order
impl DisplayCampaigns for Vec<DisplayProps> {
    fn render(&mut self, props: &DisplayProps) -> Result<()> {
        self.push(props.clone());
        Ok(())
    }
}

/// Render the current props, then re-render on every update until the view
/// is dropped. Intermediate updates published faster than the display
/// renders are coalesced.
pub async fn drive_display<D: DisplayCampaigns + ?Sized>(
    mut props: watch::Receiver<DisplayProps>,
    display: &mut D,
) -> Result<()> {
    loop {
        let current = props.borrow_and_update().clone();
        display.render(&current)?;
        if props.changed().await.is_err() {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::ballot::{Address, ContractHandle};
    use crate::config::ViewConfig;
    use crate::provider::StaticBallotProvider;
    use crate::session::{SessionContext, SessionSnapshot};
    use crate::view::UserBallotsView;

    #[tokio::test]
    async fn drives_until_view_is_dropped() {
        let provider = StaticBallotProvider::new()
            .with_ballots("0xabc", vec![serde_json::json!({"id": 1}).into()]);
        let session = Arc::new(SessionContext::with_snapshot(
            Arc::new(provider),
            SessionSnapshot::new(Address::new("0xabc"), Some(ContractHandle::new("0x1"))),
        ));
        let view = UserBallotsView::new(session, &ViewConfig::default());
        let rx = view.subscribe();

        view.fetch().await;
        drop(view);

        let mut renders: Vec<DisplayProps> = Vec::new();
        drive_display(rx, &mut renders).await.unwrap();

        // Intermediate loading state was coalesced away
        assert_eq!(renders.len(), 1);
        assert!(!renders[0].is_loading);
        assert_eq!(renders[0].campaigns.len(), 1);
    }
}
