use std::fmt::Write as _;
use std::hash::Hasher;

use lurewake_game::{ContentError, ContentLoader, ContentTables, StaticContent};
use twox_hash::XxHash64;

const SNAPSHOT_HASH: u64 = 0xea42_0464_49db_b02e;

/// Balance-relevant view of the catalog; display payloads are excluded.
fn canonical(content: &ContentTables) -> String {
    let mut out = String::new();
    for location in &content.locations {
        writeln!(
            out,
            "location {} {} {}",
            location.id, location.unlock_cost, location.min_level
        )
        .unwrap();
        for item in &location.items {
            writeln!(
                out,
                "  {} {} {} {} {} {}",
                item.name, item.category, item.value, item.rarity, item.boss, item.instant
            )
            .unwrap();
        }
    }
    for rod in &content.rods {
        writeln!(
            out,
            "rod {} {:.2} {:.2} {}",
            rod.id, rod.power, rod.max_durability, rod.price
        )
        .unwrap();
    }
    for bait in &content.baits {
        writeln!(out, "bait {} {:.2} {}", bait.id, bait.bonus, bait.price).unwrap();
    }
    out
}

fn snapshot_hash(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}

#[test]
fn content_snapshot_stable() {
    let content = StaticContent.load_content().unwrap();
    let digest = snapshot_hash(canonical(&content).as_bytes());
    assert_eq!(
        digest, SNAPSHOT_HASH,
        "content balance changed; update SNAPSHOT_HASH to {digest:#018x} if intended"
    );
}

#[test]
fn every_location_pool_has_a_catchable_fish() {
    let content = ContentTables::load_from_static();
    for location in &content.locations {
        assert!(
            location
                .items
                .iter()
                .any(|item| item.category == lurewake_game::ItemCategory::Fish),
            "{} has no fish",
            location.id
        );
    }
}

#[test]
fn malformed_content_is_rejected() {
    assert!(matches!(
        ContentTables::from_json("{"),
        Err(ContentError::Parse(_))
    ));
    let empty_pool = r#"{
        "locations": [{ "id": "pond", "name": "Pond", "items": [] }],
        "rods": [{ "id": "bamboo", "name": "Bamboo", "power": 1.0, "max_durability": 50.0 }],
        "baits": [{ "id": "none", "name": "None", "bonus": 1.0 }]
    }"#;
    assert_eq!(
        ContentTables::from_json(empty_pool),
        Err(ContentError::EmptyPool {
            id: String::from("pond")
        })
    );
    let weak_rod = empty_pool
        .replace(r#""items": []"#, r#""items": [{ "name": "Minnow" }]"#)
        .replace(r#""power": 1.0"#, r#""power": 0.0"#);
    assert_eq!(
        ContentTables::from_json(&weak_rod),
        Err(ContentError::InvalidRod {
            id: String::from("bamboo")
        })
    );
}
