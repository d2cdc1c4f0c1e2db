mod tests {
    use wled_sim_engine::{CommandEnvelope, Preset, PresetError, PresetStore};

    const PRESETS: &str = r#"{
        "0": {},
        "1": {"n": "Warm", "on": true, "bri": 180, "seg": [{"fx": 0, "col": [[255, 120, 0]]}]},
        "2": {"n": "Party", "seg": {"fx": 9, "sx": 200}},
        "3": {"n": "Loop", "playlist": {"ps": [1, 2], "dur": [50, 30], "end": 255}},
        "251": {"n": "Out of range"},
        "abc": {"n": "Bad key"},
        "4": {"n": "Broken", "seg": 5}
    }"#;

    #[test]
    fn test_from_json_skips_invalid_entries() {
        let store = PresetStore::from_json(PRESETS).unwrap();
        assert_eq!(store.ids().collect::<Vec<_>>(), [1, 2, 3]);

        let warm = store.get(1).unwrap();
        assert_eq!(warm.name, "Warm");
        assert_eq!(warm.command.bri, Some(180));
        assert_eq!(warm.command.segments()[0].fx, Some(0));
        assert!(warm.playlist().is_none());

        let party = store.get(2).unwrap();
        assert_eq!(party.command.segments().len(), 1);
        assert_eq!(party.command.segments()[0].sx, Some(200));

        let looped = store.load(3).unwrap();
        let playlist = looped.playlist().unwrap();
        assert_eq!(playlist.ps, Some(vec![1.0, 2.0]));
        assert_eq!(playlist.end, Some(255.0));
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            PresetStore::from_json("[1, 2]"),
            Err(PresetError::Parse(_))
        ));
    }

    #[test]
    fn test_insert_validates_id() {
        let mut store = PresetStore::new();
        let preset = Preset::new("a", CommandEnvelope::default());
        assert_eq!(
            store.insert(0, preset.clone()),
            Err(PresetError::InvalidId(0))
        );
        assert_eq!(
            store.insert(251, preset.clone()),
            Err(PresetError::InvalidId(251))
        );
        assert_eq!(store.insert(250, preset.clone()), Ok(None));
        assert_eq!(store.insert(250, preset.clone()), Ok(Some(preset)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.load(9), Err(PresetError::Missing(9)));
    }

    #[test]
    fn test_round_trip_through_json() {
        let store = PresetStore::from_json(PRESETS).unwrap();
        let json = store.to_json().unwrap();
        assert_eq!(PresetStore::from_json(&json).unwrap(), store);
    }
}
