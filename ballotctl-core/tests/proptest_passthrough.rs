use std::sync::Arc;

use ballotctl_core::{
    Address, BallotRecord, ContractHandle, FetchOutcome, SessionContext, SessionSnapshot,
    StaticBallotProvider, UserBallotsView, ViewConfig,
};
use proptest::prelude::*;
use serde_json::json;

// Strategy to generate ballot-shaped JSON records
fn arb_ballot() -> impl Strategy<Value = BallotRecord> {
    prop_oneof![
        any::<i64>().prop_map(|n| json!({ "id": n })),
        (any::<u32>(), ".*").prop_map(|(id, title)| json!({ "pId": id, "title": title })),
        ".*".prop_map(|s| json!(s)),
        Just(json!(null)),
    ]
    .prop_map(BallotRecord::from)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    /// Property: the view stores exactly what the provider returned
    #[test]
    fn prop_campaigns_equal_provider_result(ballots in prop::collection::vec(arb_ballot(), 0..40)) {
        let provider = StaticBallotProvider::new().with_ballots("0xabc", ballots.clone());
        let session = Arc::new(SessionContext::with_snapshot(
            Arc::new(provider),
            SessionSnapshot::new(Address::new("0xABC"), Some(ContractHandle::new("0x1"))),
        ));
        let view = UserBallotsView::new(session, &ViewConfig::default());

        let outcome = runtime().block_on(view.fetch());

        prop_assert_eq!(outcome, FetchOutcome::Loaded(ballots.len()));
        let props = view.props();
        prop_assert!(!props.is_loading);
        prop_assert_eq!(props.campaigns, ballots);
    }

    /// Property: fetching twice replaces, never merges
    #[test]
    fn prop_second_fetch_overwrites(
        first in prop::collection::vec(arb_ballot(), 0..10),
        second in prop::collection::vec(arb_ballot(), 0..10),
    ) {
        let provider = StaticBallotProvider::new()
            .with_ballots("0xa", first)
            .with_ballots("0xb", second.clone());
        let session = Arc::new(SessionContext::with_snapshot(
            Arc::new(provider),
            SessionSnapshot::new(Address::new("0xa"), Some(ContractHandle::new("0x1"))),
        ));
        let view = UserBallotsView::new(session.clone(), &ViewConfig::default());
        let rt = runtime();

        rt.block_on(view.fetch());
        session.set_address(Address::new("0xb"));
        rt.block_on(view.fetch());

        prop_assert_eq!(view.props().campaigns, second);
    }
}
