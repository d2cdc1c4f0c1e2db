mod tests {
    use wled_sim_engine::{
        CommandEnvelope, MapCache, ResolvedSegment, SegmentIndexMap,
        color::Rgb,
        command::DEFAULT_COLORS,
        resolve,
        segment::{DEFAULT_PAYLOAD, DEFAULT_SEGMENT_BRIGHTNESS},
    };

    fn command(json: &str) -> CommandEnvelope {
        CommandEnvelope::from_json(json).unwrap()
    }

    fn single(json: &str, led_count: usize) -> ResolvedSegment {
        let mut segments = resolve(&command(json), led_count);
        assert_eq!(segments.len(), 1);
        segments.remove(0)
    }

    #[test]
    fn test_group_and_spacing_map() {
        let segment = single(r#"{"seg":{"start":0,"stop":9,"grp":2,"spc":1}}"#, 9);
        assert_eq!(segment.virtual_length, 3);
        let map = SegmentIndexMap::build(&segment);
        assert_eq!(map.virtual_length(), 3);
        assert_eq!(map.len(), 9);
        assert_eq!(
            map.as_slice(),
            [
                Some(0),
                Some(0),
                None,
                Some(1),
                Some(1),
                None,
                Some(2),
                Some(2),
                None
            ]
        );
    }

    #[test]
    fn test_reverse_map() {
        let segment = single(r#"{"seg":{"stop":4,"rev":true}}"#, 10);
        let map = SegmentIndexMap::build(&segment);
        assert_eq!(map.as_slice(), [Some(3), Some(2), Some(1), Some(0)]);
    }

    #[test]
    fn test_mirror_map() {
        let segment = single(r#"{"seg":{"stop":5,"mi":true}}"#, 5);
        let map = SegmentIndexMap::build(&segment);
        assert_eq!(map.as_slice(), [Some(0), Some(1), Some(2), Some(1), Some(0)]);

        let segment = single(r#"{"seg":{"stop":4,"mi":true}}"#, 4);
        let map = SegmentIndexMap::build(&segment);
        assert_eq!(map.as_slice(), [Some(0), Some(1), Some(1), Some(0)]);
    }

    #[test]
    fn test_offset_rotates_virtual_index() {
        let segment = single(r#"{"seg":{"stop":4,"ofs":5}}"#, 4);
        assert_eq!(segment.offset, 1);
        let map = SegmentIndexMap::build(&segment);
        assert_eq!(map.as_slice(), [Some(1), Some(2), Some(3), Some(0)]);
        assert_eq!(map.get(3), Some(0));
        assert_eq!(map.get(4), None);
    }

    #[test]
    fn test_bounds_are_clamped() {
        let segment = single(r#"{"seg":{"start":50,"stop":80}}"#, 10);
        assert_eq!((segment.start, segment.stop, segment.length), (9, 10, 1));

        let segment = single(r#"{"seg":{"start":4,"stop":2}}"#, 10);
        assert_eq!((segment.start, segment.stop), (4, 5));

        let segment = single(r#"{"seg":{"start":-3,"stop":3.6}}"#, 10);
        assert_eq!((segment.start, segment.stop), (0, 4));
    }

    #[test]
    fn test_virtual_length_rounds_up() {
        let segment = single(r#"{"seg":{"stop":10,"grp":3,"spc":0}}"#, 10);
        assert_eq!(segment.virtual_length, 4);

        let segment = single(r#"{"seg":{"stop":10,"grp":0}}"#, 10);
        assert_eq!(segment.group, 1);
        assert_eq!(segment.virtual_length, 10);
    }

    #[test]
    fn test_missing_segments_default_to_full_strip() {
        let segments = resolve(&command("{}"), 12);
        assert_eq!(segments, vec![ResolvedSegment::full_strip(12)]);

        let segment = &segments[0];
        assert_eq!(segment.brightness, DEFAULT_SEGMENT_BRIGHTNESS);
        assert_eq!(segment.payload, DEFAULT_PAYLOAD);
        assert!(segment.on);

        let segments = resolve(&command(r#"{"seg":[]}"#), 12);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].stop, 12);
    }

    #[test]
    fn test_field_defaults_and_colors() {
        let segment = single(r#"{"seg":{"col":[[1,2,3],[],[7]]}}"#, 8);
        assert_eq!(segment.payload.fx, 8);
        assert_eq!(segment.payload.sx, 128);
        assert_eq!(segment.payload.ix, 128);
        assert_eq!(
            segment.payload.colors,
            [Rgb::new(1, 2, 3), DEFAULT_COLORS[1], Rgb::new(7, 0, 0)]
        );

        let segment = single(r#"{"seg":{"col":[]}}"#, 8);
        assert_eq!(segment.payload.colors, DEFAULT_COLORS);
    }

    #[test]
    fn test_single_object_and_array_agree() {
        let object = resolve(&command(r#"{"seg":{"start":1,"stop":3,"fx":0}}"#), 8);
        let array = resolve(&command(r#"{"seg":[{"start":1,"stop":3,"fx":0}]}"#), 8);
        assert_eq!(object, array);
    }

    #[test]
    fn test_resolution_is_idempotent_and_ordered() {
        let cmd = command(
            r#"{"seg":[{"start":4,"stop":8,"n":"b","i":3,"startY":0,"stopY":1},{"start":0,"stop":4}]}"#,
        );
        let first = resolve(&cmd, 8);
        assert_eq!(first, resolve(&cmd, 8));
        assert_eq!(first[0].start, 4);
        assert_eq!(first[0].name.as_deref(), Some("b"));
        assert_eq!(first[0].id, Some(3));
        assert_eq!(first[0].stop_y, Some(1));
        assert_eq!(first[1].index, 1);
    }

    #[test]
    fn test_map_cache() {
        let mut cache = MapCache::new();
        let a = single(r#"{"seg":{"stop":6,"grp":2}}"#, 6);
        let b = single(r#"{"seg":{"stop":6,"grp":2,"rev":true}}"#, 6);

        cache.sync_led_count(6);
        cache.get_or_build(&a);
        cache.get_or_build(&a);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_or_build(&b), &SegmentIndexMap::build(&b));
        assert_eq!(cache.len(), 2);

        cache.sync_led_count(6);
        assert_eq!(cache.len(), 2);
        cache.sync_led_count(7);
        assert!(cache.is_empty());

        cache.get_or_build(&a);
        cache.get_or_build(&b);
        cache.retain([b.map_key()]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_or_build(&b), &SegmentIndexMap::build(&b));

        cache.clear();
        assert!(cache.is_empty());
    }
}
