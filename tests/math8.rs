mod tests {
    use embassy_time::Duration;
    use wled_sim_engine::math8::{
        blend8, clamp_byte, clamp_int, clamp_non_negative, noise_seed, progress8, xorshift32,
    };

    #[test]
    fn test_blend8() {
        assert_eq!(blend8(0, 255, 0), 0);
        assert_eq!(blend8(0, 255, 255), 255);
        assert_eq!(blend8(0, 255, 128), 128);
        assert_eq!(blend8(255, 0, 128), 127);
    }

    #[test]
    fn test_progress8() {
        let duration = Duration::from_millis(1000);
        assert_eq!(progress8(Duration::from_millis(0), duration), 0);
        assert_eq!(progress8(Duration::from_millis(500), duration), 127);
        assert_eq!(progress8(Duration::from_millis(1000), duration), 255);
        assert_eq!(progress8(Duration::from_millis(1500), duration), 255);
        assert_eq!(
            progress8(Duration::from_millis(10), Duration::from_millis(0)),
            255
        );
    }

    #[test]
    fn test_clamp_byte() {
        assert_eq!(clamp_byte(-4.0, 9), 0);
        assert_eq!(clamp_byte(300.0, 9), 255);
        assert_eq!(clamp_byte(127.5, 9), 128);
        assert_eq!(clamp_byte(127.49, 9), 127);
        assert_eq!(clamp_byte(f64::NAN, 9), 9);
        assert_eq!(clamp_byte(f64::INFINITY, 9), 9);
    }

    #[test]
    fn test_clamp_int() {
        assert_eq!(clamp_int(-40_000.0, -32768, 32767, 0), -32768);
        assert_eq!(clamp_int(2.6, 0, 10, 0), 3);
        assert_eq!(clamp_int(f64::NAN, 0, 10, 7), 7);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(clamp_non_negative(-3.0), Some(0));
        assert_eq!(clamp_non_negative(12.4), Some(12));
        assert_eq!(clamp_non_negative(f64::NAN), None);
    }

    #[test]
    fn test_xorshift32_known_values() {
        assert_eq!(xorshift32(0), 0);
        assert_eq!(xorshift32(1), 270_369);
        assert_eq!(xorshift32(noise_seed(0, 1000)), 3_947_671_465);
        assert_eq!(xorshift32(noise_seed(3, 1000)), 3_418_237_940);
    }

    #[test]
    fn test_noise_seed_wraps() {
        assert_eq!(noise_seed(0, 1), 31);
        assert_eq!(noise_seed(1, 0), 0x9e37_79b9);
        // Only the low 32 bits reach the hash
        assert_eq!(
            xorshift32(noise_seed(1, 0) + (1 << 32)),
            xorshift32(noise_seed(1, 0))
        );
    }
}
