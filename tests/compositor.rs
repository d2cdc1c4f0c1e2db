mod tests {
    use embassy_time::Instant;
    use wled_sim_engine::{
        CommandEnvelope, EngineBackend, MapCache, RenderError, SoftwareEngine,
        engine::MAX_LEDS,
        compositor::{effective_brightness, segment_command},
        render_composited_frame, resolve,
    };

    fn composite(json: &str, led_count: usize) -> Vec<u8> {
        let command = CommandEnvelope::from_json(json).unwrap();
        let mut engine = SoftwareEngine::new();
        let mut cache = MapCache::new();
        render_composited_frame(
            &mut engine,
            &command,
            led_count,
            Instant::from_millis(0),
            &mut cache,
        )
        .unwrap()
    }

    fn pixel(frame: &[u8], index: usize) -> &[u8] {
        &frame[index * 3..index * 3 + 3]
    }

    /// Engine that hands back fewer bytes than requested
    struct ShortEngine(Vec<u8>);

    impl EngineBackend for ShortEngine {
        fn init(&mut self, led_count: usize) {
            self.0 = vec![0; led_count];
        }
        fn json_command(&mut self, _payload: &str) {}
        fn render_frame(&mut self, _now: Instant) -> &[u8] {
            &self.0
        }
        fn buffer_size(&self) -> usize {
            self.0.len()
        }
        fn last_error(&self) -> &str {
            ""
        }
    }

    /// Engine that refuses every payload
    struct RejectingEngine;

    impl EngineBackend for RejectingEngine {
        fn init(&mut self, _led_count: usize) {}
        fn json_command(&mut self, _payload: &str) {}
        fn render_frame(&mut self, _now: Instant) -> &[u8] {
            &[]
        }
        fn buffer_size(&self) -> usize {
            0
        }
        fn last_error(&self) -> &str {
            "unsupported"
        }
    }

    #[test]
    fn test_frame_size_matches_led_count() {
        for led_count in [1, 7, 300] {
            assert_eq!(composite("{}", led_count).len(), led_count * 3);
        }
        assert_eq!(composite(r#"{"seg":{"start":2,"stop":4}}"#, 10).len(), 30);
    }

    #[test]
    fn test_strip_longer_than_engine_limit_renders_black_tail() {
        let led_count = MAX_LEDS + 50_000;
        let frame = composite(r#"{"seg":{"fx":0,"bri":255,"col":[[255,0,0]]}}"#, led_count);
        assert_eq!(frame.len(), led_count * 3);
        assert_eq!(pixel(&frame, 0), [255, 0, 0]);
        assert_eq!(pixel(&frame, MAX_LEDS - 1), [255, 0, 0]);
        assert!(frame[MAX_LEDS * 3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_overlap_last_segment_wins() {
        let frame = composite(
            r#"{"bri":255,"seg":[
                {"start":0,"stop":8,"fx":0,"bri":255,"col":[[255,0,0]]},
                {"start":4,"stop":10,"fx":0,"bri":255,"col":[[0,255,0]]}
            ]}"#,
            10,
        );
        assert_eq!(pixel(&frame, 2), [255, 0, 0]);
        assert_eq!(pixel(&frame, 5), [0, 255, 0]);
        assert_eq!(pixel(&frame, 9), [0, 255, 0]);
    }

    #[test]
    fn test_global_off_or_zero_brightness_is_black() {
        let segment = r#"{"fx":0,"bri":255,"col":[[255,255,255]]}"#;
        let off = composite(&format!(r#"{{"on":false,"seg":{segment}}}"#), 6);
        assert!(off.iter().all(|&b| b == 0));
        let dark = composite(&format!(r#"{{"bri":0,"seg":{segment}}}"#), 6);
        assert!(dark.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_segment_off_blanks_only_its_range() {
        let frame = composite(
            r#"{"bri":255,"seg":[
                {"start":0,"stop":6,"fx":0,"bri":255,"col":[[10,20,30]]},
                {"start":2,"stop":4,"on":false},
                {"start":4,"stop":5,"bri":0}
            ]}"#,
            6,
        );
        assert_eq!(pixel(&frame, 1), [10, 20, 30]);
        assert_eq!(pixel(&frame, 2), [0, 0, 0]);
        assert_eq!(pixel(&frame, 3), [0, 0, 0]);
        assert_eq!(pixel(&frame, 4), [0, 0, 0]);
        assert_eq!(pixel(&frame, 5), [10, 20, 30]);
    }

    #[test]
    fn test_brightness_combines_global_and_segment() {
        assert_eq!(effective_brightness(255, 125), 125);
        assert_eq!(effective_brightness(200, 125), 98);
        assert_eq!(effective_brightness(0, 255), 0);

        let frame = composite(r#"{"bri":200,"seg":{"fx":0,"col":[[255,255,255]]}}"#, 2);
        assert_eq!(frame, [98; 6]);
    }

    #[test]
    fn test_spacing_gaps_are_black() {
        let frame = composite(
            r#"{"bri":255,"seg":{"fx":0,"bri":255,"grp":2,"spc":1,"col":[[5,5,5]]}}"#,
            6,
        );
        assert_eq!(frame, [5, 5, 5, 5, 5, 5, 0, 0, 0, 5, 5, 5, 5, 5, 5, 0, 0, 0]);
    }

    #[test]
    fn test_grouped_rainbow_repeats_virtual_pixels() {
        let frame = composite(r#"{"bri":255,"seg":{"bri":255,"grp":2}}"#, 8);
        assert_eq!(pixel(&frame, 0), pixel(&frame, 1));
        assert_eq!(pixel(&frame, 2), pixel(&frame, 3));
        assert_ne!(pixel(&frame, 1), pixel(&frame, 2));
    }

    #[test]
    fn test_segment_command_payload() {
        let command = CommandEnvelope::from_json(
            r#"{"seg":{"fx":28,"sx":10,"c2":3,"bri":255,"col":[[1,2,3]]}}"#,
        )
        .unwrap();
        let segment = &resolve(&command, 4)[0];
        let json = serde_json::to_string(&segment_command(segment, 128)).unwrap();
        assert_eq!(
            json,
            r#"{"on":true,"bri":128,"seg":{"fx":28,"sx":10,"ix":128,"pal":0,"c1":0,"c2":3,"col":[[1,2,3],[0,0,0],[0,0,0]]}}"#
        );
    }

    #[test]
    fn test_short_buffer_is_an_error() {
        let command = CommandEnvelope::from_json(r#"{"seg":{"stop":4}}"#).unwrap();
        let mut cache = MapCache::new();
        let result = render_composited_frame(
            &mut ShortEngine(Vec::new()),
            &command,
            4,
            Instant::from_millis(0),
            &mut cache,
        );
        assert_eq!(
            result,
            Err(RenderError::BufferSize {
                expected: 12,
                actual: 4
            })
        );
    }

    #[test]
    fn test_rejected_payload_is_an_error() {
        let command = CommandEnvelope::default();
        let mut cache = MapCache::new();
        let result = render_composited_frame(
            &mut RejectingEngine,
            &command,
            4,
            Instant::from_millis(0),
            &mut cache,
        );
        assert_eq!(result, Err(RenderError::Rejected("unsupported".into())));
    }

    #[test]
    fn test_cache_is_reused_across_frames() {
        let command = CommandEnvelope::from_json(
            r#"{"seg":[{"start":0,"stop":3},{"start":3,"stop":6,"rev":true}]}"#,
        )
        .unwrap();
        let mut engine = SoftwareEngine::new();
        let mut cache = MapCache::new();
        for millis in [0, 33, 66] {
            render_composited_frame(
                &mut engine,
                &command,
                6,
                Instant::from_millis(millis),
                &mut cache,
            )
            .unwrap();
        }
        assert_eq!(cache.len(), 2);

        render_composited_frame(&mut engine, &command, 8, Instant::from_millis(99), &mut cache)
            .unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_drops_shapes_no_longer_declared() {
        let mut engine = SoftwareEngine::new();
        let mut cache = MapCache::new();
        for stop in 1..=6 {
            let command =
                CommandEnvelope::from_json(&format!(r#"{{"seg":{{"start":0,"stop":{stop}}}}}"#))
                    .unwrap();
            render_composited_frame(&mut engine, &command, 6, Instant::from_millis(0), &mut cache)
                .unwrap();
            assert_eq!(cache.len(), 1);
        }
    }
}
