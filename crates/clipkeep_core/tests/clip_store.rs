use chrono::{Duration, TimeZone, Utc};
use clipkeep_core::{
    ClipFilter, ClipStore, ClipStoreError, ClipValidationError, ClipboardError, ClipboardWriter,
    CopyOutcome, KeyValueSlot, ManualClock, MemoryKeyValueSlot, SaveStatus, SlotClipPersistence,
    CLIP_STORAGE_KEY,
};
use std::cell::RefCell;
use std::collections::HashSet;
use uuid::Uuid;

fn start_clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 3, 9, 30, 0).unwrap())
}

#[test]
fn create_prepends_clip_with_fresh_id() {
    let slot = MemoryKeyValueSlot::new();
    let clock = start_clock();
    let mut store = ClipStore::with_clock(SlotClipPersistence::new(&slot), &clock);
    store.hydrate();

    let mut ids = HashSet::new();
    for content in ["alpha", "beta", "  gamma  "] {
        let created = store.create(content, None).unwrap();
        assert!(ids.insert(created.id()));

        let all = store.query(&ClipFilter::all());
        assert_eq!(all[0].id(), created.id());
        assert_eq!(all[0].content(), content.trim());
        assert_eq!(all[0].created_at(), all[0].updated_at());
    }
    assert_eq!(store.len(), 3);
}

#[test]
fn create_normalizes_blank_tag_to_absent() {
    let slot = MemoryKeyValueSlot::new();
    let mut store = ClipStore::new(SlotClipPersistence::new(&slot));

    let blank = store.create("body", Some("   ")).unwrap();
    let trimmed = store.create("body", Some(" Draft ")).unwrap();

    assert_eq!(blank.tag(), None);
    assert_eq!(trimmed.tag(), Some("Draft"));
}

#[test]
fn create_rejects_blank_content_and_leaves_collection_unchanged() {
    let slot = MemoryKeyValueSlot::new();
    let clock = start_clock();
    let mut store = ClipStore::with_clock(SlotClipPersistence::new(&slot), &clock);
    store.create("existing", Some("Idea")).unwrap();
    let before = store.clips().to_vec();

    for content in ["", "   ", "\n\t "] {
        let err = store.create(content, Some("Idea")).unwrap_err();
        assert_eq!(
            err,
            ClipStoreError::Validation(ClipValidationError::EmptyContent)
        );
    }

    assert_eq!(store.clips(), before.as_slice());
    assert_eq!(slot.write_count(), 1);
}

#[test]
fn update_preserves_identity_position_and_advances_updated_at() {
    let slot = MemoryKeyValueSlot::new();
    let clock = start_clock();
    let mut store = ClipStore::with_clock(SlotClipPersistence::new(&slot), &clock);
    let oldest = store.create("oldest", None).unwrap();
    let middle = store.create("middle", Some("Code")).unwrap();
    store.create("newest", None).unwrap();

    clock.advance(Duration::seconds(42));
    let updated = store
        .update(middle.id(), "  middle, edited \n", Some("Meeting"))
        .unwrap();

    assert_eq!(updated.id(), middle.id());
    assert_eq!(updated.created_at(), middle.created_at());
    assert_eq!(updated.content(), "middle, edited");
    assert_eq!(updated.tag(), Some("Meeting"));
    assert_eq!(updated.updated_at(), middle.updated_at() + Duration::seconds(42));

    let order: Vec<_> = store.clips().iter().map(|clip| clip.id()).collect();
    assert_eq!(order[1], middle.id());
    assert_eq!(order[2], oldest.id());
}

#[test]
fn update_with_unchanged_clock_keeps_equal_timestamp() {
    let slot = MemoryKeyValueSlot::new();
    let clock = start_clock();
    let mut store = ClipStore::with_clock(SlotClipPersistence::new(&slot), &clock);
    let created = store.create("same instant", None).unwrap();

    let updated = store.update(created.id(), "same instant v2", None).unwrap();
    assert_eq!(updated.updated_at(), created.updated_at());
}

#[test]
fn update_unknown_id_returns_not_found_without_changes() {
    let slot = MemoryKeyValueSlot::new();
    let mut store = ClipStore::new(SlotClipPersistence::new(&slot));
    store.create("only", None).unwrap();
    let before = store.clips().to_vec();
    let missing = Uuid::new_v4();

    let err = store.update(missing, "content", None).unwrap_err();
    assert_eq!(err, ClipStoreError::NotFound(missing));
    assert_eq!(store.clips(), before.as_slice());
    assert_eq!(slot.write_count(), 1);
}

#[test]
fn delete_is_idempotent_and_saves_only_on_removal() {
    let slot = MemoryKeyValueSlot::new();
    let mut store = ClipStore::new(SlotClipPersistence::new(&slot));
    let first = store.create("first", None).unwrap();
    let second = store.create("second", None).unwrap();
    let third = store.create("third", None).unwrap();

    assert!(store.delete(second.id()));
    assert_eq!(slot.write_count(), 4);
    let after_first_delete = store.clips().to_vec();

    assert!(!store.delete(second.id()));
    assert_eq!(slot.write_count(), 4);
    assert_eq!(store.clips(), after_first_delete.as_slice());

    let order: Vec<_> = store.clips().iter().map(|clip| clip.id()).collect();
    assert_eq!(order, vec![third.id(), first.id()]);
}

#[test]
fn personal_and_code_scenario() {
    let slot = MemoryKeyValueSlot::new();
    let clock = start_clock();
    let mut store = ClipStore::with_clock(SlotClipPersistence::new(&slot), &clock);
    store.hydrate();

    let a = store.create("buy milk", Some("Personal")).unwrap();
    clock.advance(Duration::seconds(1));
    let b = store.create("fix bug", Some("Code")).unwrap();

    let by_search = store.query(&ClipFilter::all().with_search("bug"));
    assert_eq!(by_search, vec![b.clone()]);

    let by_tag = store.query(&ClipFilter::all().with_tag("Personal"));
    assert_eq!(by_tag, vec![a.clone()]);

    assert!(store.delete(a.id()));
    assert_eq!(store.query(&ClipFilter::all()), vec![b]);
}

#[test]
fn rejected_edit_keeps_original_content() {
    let slot = MemoryKeyValueSlot::new();
    let mut store = ClipStore::new(SlotClipPersistence::new(&slot));
    store.create("buy milk", Some("Personal")).unwrap();
    let b = store.create("fix bug", Some("Code")).unwrap();

    let err = store.update(b.id(), "", Some("Code")).unwrap_err();
    assert!(matches!(err, ClipStoreError::Validation(_)));

    let all = store.query(&ClipFilter::all());
    let stored_b = all.iter().find(|clip| clip.id() == b.id()).unwrap();
    assert_eq!(stored_b, &b);
}

#[test]
fn query_combines_tag_and_search_and_keeps_order() {
    let slot = MemoryKeyValueSlot::new();
    let mut store = ClipStore::new(SlotClipPersistence::new(&slot));
    let older = store.create("cargo test --all", Some("Code")).unwrap();
    store.create("Cargo shipment arrives", Some("Personal")).unwrap();
    let newer = store.create("cargo clippy", Some("Code")).unwrap();

    let hits = store.query(&ClipFilter::all().with_tag("Code").with_search("CARGO"));
    assert_eq!(hits, vec![newer, older]);

    let tag_text_hits = store.query(&ClipFilter::all().with_search("person"));
    assert_eq!(tag_text_hits.len(), 1);
    assert_eq!(tag_text_hits[0].content(), "Cargo shipment arrives");

    let everything = store.query(&ClipFilter::all().with_tag("All"));
    assert_eq!(everything.len(), 3);
    assert_eq!(slot.write_count(), 3);
}

#[test]
fn mutations_write_through_to_slot() {
    let slot = MemoryKeyValueSlot::new();
    let mut store = ClipStore::new(SlotClipPersistence::new(&slot));
    let clip = store.create("persist me", Some("Draft")).unwrap();

    let raw = slot.raw(CLIP_STORAGE_KEY).unwrap();
    assert!(raw.contains(&clip.id().to_string()));
    assert!(raw.contains("\"createdAt\""));

    store.update(clip.id(), "persisted edit", None).unwrap();
    let raw = slot.read(CLIP_STORAGE_KEY).unwrap().unwrap();
    assert!(raw.contains("persisted edit"));
    assert!(raw.contains("\"tag\":null"));
}

#[test]
fn store_keeps_working_when_storage_is_unavailable() {
    let slot = MemoryKeyValueSlot::new();
    slot.set_available(false);
    let mut store = ClipStore::new(SlotClipPersistence::new(&slot));
    store.hydrate();

    let clip = store.create("memory only", None).unwrap();
    assert!(matches!(
        store.last_save_status(),
        Some(SaveStatus::Failed(_))
    ));

    store.update(clip.id(), "still memory only", None).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.clips()[0].content(), "still memory only");
    assert_eq!(slot.write_count(), 0);

    slot.set_available(true);
    assert!(store.delete(clip.id()));
    assert_eq!(store.last_save_status(), Some(&SaveStatus::Saved));
}

#[test]
fn hydrate_restores_previous_session_in_order() {
    let slot = MemoryKeyValueSlot::new();
    let (first, second) = {
        let mut store = ClipStore::new(SlotClipPersistence::new(&slot));
        let first = store.create("first", Some("Idea")).unwrap();
        let second = store.create("second", None).unwrap();
        (first, second)
    };

    let mut reopened = ClipStore::new(SlotClipPersistence::new(&slot));
    assert!(reopened.is_empty());
    reopened.hydrate();

    assert_eq!(reopened.clips(), &[second, first]);
}

#[derive(Default)]
struct FakeClipboard {
    written: RefCell<Vec<String>>,
    deny: bool,
}

impl ClipboardWriter for FakeClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.deny {
            return Err(ClipboardError::AccessDenied("no permission".to_string()));
        }
        self.written.borrow_mut().push(text.to_string());
        Ok(())
    }
}

#[test]
fn copy_hands_content_to_clipboard_without_mutation() {
    let slot = MemoryKeyValueSlot::new();
    let mut store = ClipStore::new(SlotClipPersistence::new(&slot));
    let clip = store.create("ssh deploy@host", Some("Code")).unwrap();
    let writes_before = slot.write_count();

    let clipboard = FakeClipboard::default();
    let outcome = store.copy_to_clipboard(clip.id(), &clipboard).unwrap();
    assert_eq!(outcome, CopyOutcome::Copied);
    assert_eq!(clipboard.written.borrow().as_slice(), ["ssh deploy@host"]);

    let denied = FakeClipboard {
        deny: true,
        ..FakeClipboard::default()
    };
    let outcome = store.copy_to_clipboard(clip.id(), &denied).unwrap();
    assert!(matches!(
        outcome,
        CopyOutcome::Failed(ClipboardError::AccessDenied(_))
    ));

    assert_eq!(store.get(clip.id()), Some(&clip));
    assert_eq!(slot.write_count(), writes_before);

    let missing = Uuid::new_v4();
    assert_eq!(
        store.copy_to_clipboard(missing, &clipboard).unwrap_err(),
        ClipStoreError::NotFound(missing)
    );
}
