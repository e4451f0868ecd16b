use kalamar_core::{
    AccessPoint, AccessPointConfig, AliasTable, FormatRegistry, Item, ItemParser, ItemResult,
    MultiMap, Namespace, Opener, PropertyValue,
};
use std::cell::Cell;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

/// Splits `key=value` lines into parser properties and counts parse calls.
struct CountingParser {
    calls: Rc<Cell<usize>>,
}

impl ItemParser for CountingParser {
    fn format(&self) -> &str {
        "counting"
    }

    fn parse_data(&self, content: &[u8], _encoding: &str) -> MultiMap<PropertyValue> {
        self.calls.set(self.calls.get() + 1);
        String::from_utf8_lossy(content)
            .lines()
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.to_string(), PropertyValue::from(value)))
            .collect()
    }

    fn serialize(&self, item: &Item) -> ItemResult<Vec<u8>> {
        let lines: Vec<String> = item
            .raw_parser_properties()
            .iter()
            .filter_map(|(key, value)| value.as_text().map(|text| format!("{key}={text}")))
            .collect();
        Ok(lines.join("\n").into_bytes())
    }
}

/// Access point whose storage aliases can be swapped after items exist.
struct RetunedAccessPoint {
    before: AliasTable,
    after: AliasTable,
    retuned: Cell<bool>,
    no_aliases: AliasTable,
}

impl RetunedAccessPoint {
    fn new(before: AliasTable, after: AliasTable) -> Self {
        Self {
            before,
            after,
            retuned: Cell::new(false),
            no_aliases: AliasTable::new(),
        }
    }

    fn retune(&self) {
        self.retuned.set(true);
    }
}

impl AccessPoint for RetunedAccessPoint {
    fn parser_name(&self) -> Option<&str> {
        Some("counting")
    }

    fn storage_aliases(&self) -> &AliasTable {
        if self.retuned.get() {
            &self.after
        } else {
            &self.before
        }
    }

    fn parser_aliases(&self) -> &AliasTable {
        &self.no_aliases
    }

    fn default_encoding(&self) -> &str {
        "utf-8"
    }

    fn storage_properties(&self) -> Vec<String> {
        vec!["artist".to_string(), "album".to_string()]
    }
}

fn counting_registry(calls: Rc<Cell<usize>>) -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    registry
        .register(Arc::new(CountingParser { calls }))
        .expect("counting parser should register");
    registry
}

fn tracks_config() -> AccessPointConfig {
    let mut config = AccessPointConfig::new("tracks");
    config.parser = Some("counting".to_string());
    config.storage_properties = vec!["artist".to_string(), "album".to_string()];
    config
}

fn opener_for(content: &'static str, opened: Rc<Cell<usize>>) -> Opener {
    Box::new(move || {
        opened.set(opened.get() + 1);
        Some(content.as_bytes().to_vec())
    })
}

fn storage(pairs: &[(&str, &str)]) -> MultiMap<PropertyValue> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), PropertyValue::from(*value)))
        .collect()
}

fn load_item(config: AccessPointConfig, content: &'static str) -> Item {
    let registry = counting_registry(Rc::new(Cell::new(0)));
    registry
        .get_item_parser(
            Rc::new(config),
            Some(opener_for(content, Rc::new(Cell::new(0)))),
            storage(&[("artist", "muse"), ("album", "absolution")]),
        )
        .expect("counting format should dispatch")
}

#[test]
fn unknown_key_reads_as_none() {
    let item = load_item(tracks_config(), "title=hysteria");

    assert_eq!(item.get("genre"), None);
    assert!(item.get_all("genre").is_empty());
    assert!(!item.modified());
}

#[test]
fn storage_write_only_flags_storage() {
    let mut item = load_item(tracks_config(), "title=hysteria");

    item.set("artist", "radiohead");

    assert_eq!(item.get("artist"), Some(&PropertyValue::from("radiohead")));
    assert!(item.storage_modified());
    assert!(!item.parser_modified());
    assert!(item.modified());
}

#[test]
fn parser_write_only_flags_parser() {
    let mut item = load_item(tracks_config(), "title=hysteria");

    item.set("title", "time is running out");

    assert_eq!(
        item.get("title"),
        Some(&PropertyValue::from("time is running out"))
    );
    assert!(item.parser_modified());
    assert!(!item.storage_modified());
    assert!(item.modified());
}

#[test]
fn unknown_key_write_goes_to_parser_namespace() {
    let mut item = load_item(tracks_config(), "");

    assert_eq!(item.classify("tempo"), Namespace::Parser);
    item.set("tempo", 94_i64);

    assert_eq!(item.get("tempo"), Some(&PropertyValue::Number(94.0)));
    assert!(item.raw_parser_properties().contains_key("tempo"));
    assert!(!item.raw_storage_properties().contains_key("tempo"));
    assert!(item.parser_modified());
    assert!(!item.storage_modified());
}

#[test]
fn parse_data_runs_once_for_many_reads_and_writes() {
    let calls = Rc::new(Cell::new(0));
    let opened = Rc::new(Cell::new(0));
    let registry = counting_registry(calls.clone());
    let mut item = registry
        .get_item_parser(
            Rc::new(tracks_config()),
            Some(opener_for("title=hysteria\nyear=2003", opened.clone())),
            storage(&[("artist", "muse")]),
        )
        .expect("counting format should dispatch");

    assert_eq!(calls.get(), 0, "construction must not parse");
    assert_eq!(opened.get(), 0, "construction must not open content");

    for _ in 0..5 {
        assert_eq!(item.get("title"), Some(&PropertyValue::from("hysteria")));
        let _ = item.keys();
    }
    item.set("year", "2004");
    assert_eq!(item.get("year"), Some(&PropertyValue::from("2004")));
    let _ = item.content();

    assert_eq!(calls.get(), 1);
    assert_eq!(opened.get(), 1);
}

#[test]
fn storage_reads_do_not_parse() {
    let calls = Rc::new(Cell::new(0));
    let registry = counting_registry(calls.clone());
    let item = registry
        .get_item_parser(
            Rc::new(tracks_config()),
            Some(opener_for("title=hysteria", Rc::new(Cell::new(0)))),
            storage(&[("artist", "muse")]),
        )
        .expect("counting format should dispatch");

    assert_eq!(item.get("artist"), Some(&PropertyValue::from("muse")));
    assert_eq!(calls.get(), 0);
}

#[test]
fn storage_alias_wins_over_parser_alias() {
    let mut config = tracks_config();
    config.storage_aliases = [("name", "artist")].into_iter().collect();
    config.parser_aliases = [("name", "title")].into_iter().collect();
    let item = load_item(config, "title=hysteria");

    assert_eq!(item.classify("name"), Namespace::Storage);
    assert_eq!(item.get("name"), Some(&PropertyValue::from("muse")));
}

#[test]
fn storage_alias_classifies_as_storage_even_when_stored_under_that_name() {
    let mut config = tracks_config();
    config.storage_aliases = [("album", "artist")].into_iter().collect();
    let item = load_item(config, "");

    assert_eq!(item.classify("album"), Namespace::Storage);
    assert_eq!(item.get("album"), Some(&PropertyValue::from("muse")));
}

#[test]
fn parser_alias_wins_over_same_named_storage_key() {
    let mut config = tracks_config();
    config.parser_aliases = [("artist", "performer")].into_iter().collect();
    let mut item = load_item(config, "performer=matt bellamy");

    assert_eq!(item.classify("artist"), Namespace::Parser);
    assert_eq!(item.get("artist"), Some(&PropertyValue::from("matt bellamy")));

    item.set("artist", "dom howard");
    assert!(item.parser_modified());
    assert!(!item.storage_modified());
    assert_eq!(
        item.raw_parser_properties().get("performer"),
        Some(&PropertyValue::from("dom howard"))
    );
    assert_eq!(
        item.raw_storage_properties().get("artist"),
        Some(&PropertyValue::from("muse"))
    );
}

#[test]
fn item_keeps_its_own_alias_snapshot() {
    let config = Rc::new({
        let mut config = tracks_config();
        config.storage_aliases = [("singer", "artist")].into_iter().collect();
        config
    });
    let item = counting_registry(Rc::new(Cell::new(0)))
        .get_item_parser(config.clone(), None, storage(&[("artist", "muse")]))
        .expect("counting format should dispatch");

    let expected: AliasTable = [("singer", "artist")].into_iter().collect();
    assert_eq!(item.storage_aliases(), &expected);
    assert_eq!(item.get("singer"), Some(&PropertyValue::from("muse")));
}

#[test]
fn later_alias_changes_do_not_reach_existing_items() {
    let access_point = Rc::new(RetunedAccessPoint::new(
        [("singer", "artist")].into_iter().collect(),
        [("record", "album")].into_iter().collect(),
    ));
    let registry = counting_registry(Rc::new(Cell::new(0)));
    let existing = registry
        .get_item_parser(
            access_point.clone(),
            None,
            storage(&[("artist", "muse"), ("album", "absolution")]),
        )
        .expect("counting format should dispatch");

    access_point.retune();
    assert!(access_point.storage_aliases().is_alias("record"));

    assert_eq!(existing.classify("singer"), Namespace::Storage);
    assert_eq!(existing.get("singer"), Some(&PropertyValue::from("muse")));
    assert_eq!(existing.classify("record"), Namespace::Parser);
    assert_eq!(existing.get("record"), None);

    let fresh = registry
        .get_item_parser(
            access_point,
            None,
            storage(&[("artist", "muse"), ("album", "absolution")]),
        )
        .expect("counting format should dispatch");
    assert_eq!(fresh.get("record"), Some(&PropertyValue::from("absolution")));
    assert_eq!(fresh.classify("singer"), Namespace::Parser);
}

#[test]
fn keys_are_the_union_without_duplicates() {
    let registry = counting_registry(Rc::new(Cell::new(0)));
    let item = registry
        .get_item_parser(
            Rc::new(tracks_config()),
            Some(opener_for("title=hysteria\nartist=shadow", Rc::new(Cell::new(0)))),
            storage(&[("artist", "muse"), ("album", "absolution")]),
        )
        .expect("counting format should dispatch");

    let expected: BTreeSet<String> = ["album", "artist", "title"]
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(item.keys(), expected);
    assert_eq!(item.get("artist"), Some(&PropertyValue::from("muse")));
}

#[test]
fn missing_opener_reads_as_empty_content() {
    let item = counting_registry(Rc::new(Cell::new(0)))
        .get_item_parser(Rc::new(tracks_config()), None, MultiMap::new())
        .expect("counting format should dispatch");

    assert!(item.content().is_empty());
    assert!(item.raw_parser_properties().is_empty());
}

#[test]
fn serialize_reflects_parser_writes() {
    let mut item = load_item(tracks_config(), "title=hysteria");
    item.set("title", "stockholm syndrome");

    let bytes = item.serialize().expect("counting serialize");
    assert_eq!(bytes, b"title=stockholm syndrome".to_vec());
}

#[test]
fn encoding_comes_from_access_point() {
    let mut config = tracks_config();
    config.default_encoding = "latin-1".to_string();
    let item = load_item(config, "");

    assert_eq!(item.encoding(), "latin-1");
}

#[test]
fn filename_uses_access_point_capability() {
    let mut config = tracks_config();
    config.base_dir = Some(PathBuf::from("/srv/music"));
    config.filename_property = Some("path".to_string());
    config.storage_properties.push("path".to_string());
    let item = counting_registry(Rc::new(Cell::new(0)))
        .get_item_parser(
            Rc::new(config),
            None,
            storage(&[("artist", "muse"), ("path", "muse/hysteria.ogg")]),
        )
        .expect("counting format should dispatch");

    assert_eq!(
        item.filename(),
        Some(PathBuf::from("/srv/music/muse/hysteria.ogg"))
    );
}

#[test]
fn filename_is_none_without_capability() {
    let item = load_item(tracks_config(), "");
    assert_eq!(item.filename(), None);
}

#[test]
fn explicit_flag_reset_clears_modified() {
    let mut item = load_item(tracks_config(), "title=hysteria");
    item.set("artist", "radiohead");
    item.set("title", "airbag");
    assert!(item.modified());

    item.set_storage_modified(false);
    item.set_parser_modified(false);
    assert!(!item.modified());
}
