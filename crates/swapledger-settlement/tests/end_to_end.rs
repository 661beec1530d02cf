//! End-to-end tests across registry, order book, planner and settlement.
//!
//! Each scenario runs against both order-book layouts: the matching result
//! must not depend on how the book is stored.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use swapledger_matchcore::verify_match_root;
use swapledger_registry::{AssetRegistry, FixedClock, OrderBook};
use swapledger_settlement::{MatchingEngine, SwapExecutor};
use swapledger_store::{MemoryStore, Store};
use swapledger_types::{
    AssetId, BookConfig, BookLayout, Category, CycleKind, Descriptor, OwnerId, SwapParty,
    SwapPolicy,
};

/// One ledger plus the configuration a host would run it with.
struct Ledger {
    store: MemoryStore,
    book: BookConfig,
    clock: FixedClock,
}

impl Ledger {
    fn new(layout: BookLayout) -> Self {
        Self {
            store: MemoryStore::new(),
            book: BookConfig {
                layout,
                ..BookConfig::default()
            },
            clock: FixedClock::new(1_700_000_000_000),
        }
    }

    fn asset(&mut self, id: &str, category: &str, size: u64, owner: &str) {
        AssetRegistry::new(&mut self.store)
            .create(
                AssetId::parse(id).unwrap(),
                Category::parse(category).unwrap(),
                size,
                OwnerId::parse(owner).unwrap(),
            )
            .unwrap();
    }

    fn order(&mut self, who: &str, want: (&str, u64), offer: (&str, u64)) {
        OrderBook::new(&mut self.store, &self.book)
            .post(
                &self.clock,
                OwnerId::parse(who).unwrap(),
                Descriptor::dummy(want.0, want.1),
                Descriptor::dummy(offer.0, offer.1),
            )
            .unwrap();
    }

    fn owner(&mut self, id: &str) -> String {
        AssetRegistry::new(&mut self.store)
            .read_asset(&AssetId::parse(id).unwrap())
            .unwrap()
            .owner
            .to_string()
    }

    fn open_orders(&mut self) -> usize {
        OrderBook::new(&mut self.store, &self.book)
            .open_orders()
            .unwrap()
            .len()
    }

    fn engine(&self) -> MatchingEngine {
        MatchingEngine::new(self.book.clone(), SwapPolicy::default())
    }

    /// Count of assets per category: matching must never create or destroy any.
    fn census(&mut self) -> BTreeMap<String, usize> {
        let records = AssetRegistry::new(&mut self.store)
            .list_by_key_range("", "")
            .unwrap()
            .collect_all()
            .unwrap();
        let mut census = BTreeMap::new();
        for kv in records {
            let value: serde_json::Value = serde_json::from_slice(&kv.value).unwrap();
            if value["docType"] == "asset" {
                *census
                    .entry(value["category"].as_str().unwrap().to_string())
                    .or_default() += 1;
            }
        }
        census
    }
}

const LAYOUTS: [BookLayout; 2] = [BookLayout::Aggregate, BookLayout::Keyed];

#[test]
fn pairwise_red_blue_exchange() {
    for layout in LAYOUTS {
        let mut ledger = Ledger::new(layout);
        ledger.asset("marble1", "red", 10, "alice");
        ledger.asset("marble2", "blue", 5, "bob");
        ledger.order("alice", ("red", 10), ("blue", 5));
        ledger.order("bob", ("blue", 5), ("red", 10));

        // alice offers blue but holds red: the cycle is skipped.
        let stalled = ledger.engine().match_pairwise(&mut ledger.store).unwrap();
        assert!(stalled.cycles.is_empty());
        assert_eq!(stalled.skipped.len(), 1);
        assert_eq!(stalled.remaining, 2);
        assert_eq!(ledger.open_orders(), 2);

        ledger.asset("marble3", "blue", 5, "alice");
        ledger.asset("marble4", "red", 10, "bob");
        let report = ledger.engine().match_pairwise(&mut ledger.store).unwrap();
        assert_eq!(report.cycles.len(), 1);
        assert!(verify_match_root(&report.cycles, &report.match_root));
        assert_eq!(ledger.open_orders(), 0);

        // One blue-5 moves to bob, one red-10 moves to alice.
        assert_eq!(ledger.owner("marble3"), "bob");
        assert_eq!(ledger.owner("marble4"), "alice");
        assert_eq!(ledger.owner("marble1"), "alice");
        assert_eq!(ledger.owner("marble2"), "bob");
    }
}

#[test]
fn three_cycle_moves_each_asset_to_the_next_party() {
    for layout in LAYOUTS {
        let mut ledger = Ledger::new(layout);
        ledger.asset("ma", "red", 1, "a");
        ledger.asset("mb", "blue", 1, "b");
        ledger.asset("mc", "green", 1, "c");
        // a gives red to b, b gives blue to c, c gives green to a.
        ledger.order("a", ("green", 1), ("red", 1));
        ledger.order("b", ("red", 1), ("blue", 1));
        ledger.order("c", ("blue", 1), ("green", 1));

        assert!(ledger.engine().match_pairwise(&mut ledger.store).unwrap().cycles.is_empty());
        let report = ledger.engine().match_tripartite(&mut ledger.store).unwrap();
        assert_eq!(report.kind, CycleKind::Tripartite);
        assert_eq!(report.consumed(), 3);
        assert_eq!(ledger.open_orders(), 0);
        assert_eq!(ledger.owner("ma"), "b");
        assert_eq!(ledger.owner("mb"), "c");
        assert_eq!(ledger.owner("mc"), "a");
    }
}

#[test]
fn reversed_three_cycle_follows_wants() {
    for layout in LAYOUTS {
        let mut ledger = Ledger::new(layout);
        ledger.asset("ma", "red", 1, "a");
        ledger.asset("mb", "blue", 1, "b");
        ledger.asset("mc", "green", 1, "c");
        // a wants blue (from b), b wants green (from c), c wants red (from a).
        ledger.order("a", ("blue", 1), ("red", 1));
        ledger.order("b", ("green", 1), ("blue", 1));
        ledger.order("c", ("red", 1), ("green", 1));

        ledger.engine().match_tripartite(&mut ledger.store).unwrap();
        assert_eq!(ledger.owner("mb"), "a");
        assert_eq!(ledger.owner("mc"), "b");
        assert_eq!(ledger.owner("ma"), "c");
    }
}

#[test]
fn near_matches_leave_the_book_unchanged() {
    for layout in LAYOUTS {
        let mut ledger = Ledger::new(layout);
        ledger.asset("m1", "red", 10, "alice");
        ledger.asset("m2", "blue", 5, "bob");
        ledger.order("alice", ("blue", 5), ("red", 10));
        ledger.order("bob", ("red", 11), ("blue", 5));
        let before = ledger.store.snapshot().state;

        let engine = ledger.engine();
        assert!(engine.match_pairwise(&mut ledger.store).unwrap().cycles.is_empty());
        assert!(engine.match_tripartite(&mut ledger.store).unwrap().cycles.is_empty());
        assert_eq!(ledger.store.snapshot().state, before);
    }
}

#[test]
fn shuffled_pairs_conserve_assets_and_agree_across_layouts() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut people: Vec<usize> = (0..8).collect();
    people.shuffle(&mut rng);

    let mut roots = Vec::new();
    for layout in LAYOUTS {
        let mut ledger = Ledger::new(layout);
        for &n in &people {
            let cat = format!("c{n}");
            ledger.asset(&format!("x{n}"), &cat, 1, &format!("x{n}"));
            ledger.asset(&format!("y{n}"), "base", 1, &format!("y{n}"));
            ledger.order(&format!("x{n}"), ("base", 1), (&cat, 1));
            ledger.order(&format!("y{n}"), (&cat, 1), ("base", 1));
        }
        let census = ledger.census();

        let report = ledger.engine().match_pairwise(&mut ledger.store).unwrap();
        assert_eq!(report.cycles.len(), 8);
        assert_eq!(ledger.open_orders(), 0);
        assert_eq!(ledger.census(), census);
        for n in 0..8 {
            assert_eq!(ledger.owner(&format!("x{n}")), format!("y{n}"));
            assert_eq!(ledger.owner(&format!("y{n}")), format!("x{n}"));
        }
        roots.push(report.match_root);
    }
    assert_eq!(roots[0], roots[1]);
}

#[test]
fn direct_swap_then_bulk_transfer() {
    let mut ledger = Ledger::new(BookLayout::Aggregate);
    ledger.asset("m1", "red", 10, "alice");
    ledger.asset("m2", "blue", 5, "bob");
    let receipt = SwapExecutor::default()
        .execute(
            &mut ledger.store,
            &[
                SwapParty::new(OwnerId::parse("alice").unwrap(), Descriptor::dummy("red", 10)),
                SwapParty::new(OwnerId::parse("bob").unwrap(), Descriptor::dummy("blue", 5)),
            ],
        )
        .unwrap();
    assert_eq!(receipt.legs.len(), 2);
    assert_eq!(ledger.owner("m1"), "bob");

    let moved = AssetRegistry::new(&mut ledger.store)
        .transfer_by_category(&Category::parse("red").unwrap(), &OwnerId::parse("carol").unwrap())
        .unwrap();
    assert_eq!(moved, 1);
    assert_eq!(ledger.owner("m1"), "carol");
    let none = AssetRegistry::new(&mut ledger.store)
        .transfer_by_category(&Category::parse("purple").unwrap(), &OwnerId::parse("carol").unwrap())
        .unwrap();
    assert_eq!(none, 0);
    assert_eq!(ledger.store.open_cursors(), 0);
}

#[test]
fn history_tracks_every_settled_move() {
    let mut ledger = Ledger::new(BookLayout::Keyed);
    ledger.asset("m1", "red", 1, "a");
    ledger.asset("m2", "blue", 1, "b");
    ledger.order("a", ("blue", 1), ("red", 1));
    ledger.order("b", ("red", 1), ("blue", 1));
    ledger.engine().match_pairwise(&mut ledger.store).unwrap();

    let history = ledger.store.history("m1").unwrap().collect_all().unwrap();
    assert_eq!(history.len(), 2);
    let last: serde_json::Value = serde_json::from_slice(history[1].value.as_ref().unwrap()).unwrap();
    assert_eq!(last["owner"], "b");
}
