mod support;

mod tests {
    use trellis_light_units::buttons::HoldStage;
    use trellis_light_units::color::{OFF, rgb_from_u32};
    use trellis_light_units::grid::pixel_bit;
    use trellis_light_units::{
        ButtonDebouncer, ButtonEvents, CompositorConfig, DebounceConfig, LightUnit,
    };

    use crate::support::{compositor, compositor_with, hold, release_all};

    const GREEN: u32 = 0x00_FF00;
    const RED: u32 = 0xFF_0000;

    fn stuck_config() -> CompositorConfig {
        CompositorConfig {
            debounce: DebounceConfig {
                min_press: 1,
                long_press: 2,
                max_press: 4,
                ..DebounceConfig::default()
            },
        }
    }

    #[test]
    fn test_hold_stages() {
        let debouncer = ButtonDebouncer::new(&DebounceConfig::default());

        assert_eq!(debouncer.stage(1), HoldStage::Waiting);
        assert_eq!(debouncer.stage(2), HoldStage::Short);
        assert_eq!(debouncer.stage(24), HoldStage::Short);
        assert_eq!(debouncer.stage(25), HoldStage::Long);
        assert_eq!(debouncer.stage(499), HoldStage::Long);
        assert_eq!(debouncer.stage(500), HoldStage::Stuck);
    }

    #[test]
    fn test_short_press() {
        let mut compositor = compositor();
        let button = pixel_bit(10);

        hold(&mut compositor, button, 2);
        assert_eq!(compositor.buttons().pressed, button);
        assert_eq!(compositor.buttons().pressed_counter[10], 2);

        release_all(&mut compositor);

        let events = compositor.button_events();
        assert_eq!(events.short, button);
        assert_eq!(events.long, 0);
        assert_eq!(events.aborted, 0);
        assert_eq!(compositor.buttons().pressed, 0);
        assert_eq!(compositor.buttons().changed_state, 0);
        assert_eq!(compositor.buttons().pressed_counter[10], 0);
        assert_eq!(compositor.sink().pixels[10], OFF);
    }

    #[test]
    fn test_too_short_press_is_ignored() {
        let mut compositor = compositor();

        hold(&mut compositor, pixel_bit(10), 1);
        release_all(&mut compositor);

        assert!(compositor.button_events().is_empty());
    }

    #[test]
    fn test_press_feedback_colors() {
        let mut compositor = compositor();
        let colors = DebounceConfig::default().colors;

        hold(&mut compositor, pixel_bit(0), 1);
        assert_eq!(compositor.sink().pixels[0], colors.waiting);

        hold(&mut compositor, pixel_bit(0), 1);
        let highlight = compositor.sink().pixels[0];
        assert_ne!(highlight, colors.waiting);
        assert_ne!(highlight, OFF);

        hold(&mut compositor, pixel_bit(0), 23);
        assert_eq!(compositor.sink().pixels[0], colors.long_press);
    }

    #[test]
    fn test_long_press() {
        let mut compositor = compositor();
        let button = pixel_bit(3);

        hold(&mut compositor, button, 25);
        release_all(&mut compositor);

        let events = compositor.button_events();
        assert_eq!(events.short, 0);
        assert_eq!(events.long, button);
        assert_eq!(compositor.buttons().pending_press, button);
        assert_eq!(compositor.buttons().pending_long_press, button);
    }

    #[test]
    fn test_counters_survive_while_other_button_held() {
        let mut compositor = compositor();

        hold(&mut compositor, pixel_bit(1) | pixel_bit(2), 3);
        hold(&mut compositor, pixel_bit(2), 1);

        assert_eq!(compositor.button_events().short, pixel_bit(1));
        assert_eq!(compositor.buttons().pressed, pixel_bit(2));
        assert_eq!(compositor.buttons().pressed_counter[2], 4);
    }

    #[test]
    fn test_stuck_button_aborts_once() {
        let mut compositor = compositor_with(&stuck_config());
        let button = pixel_bit(5);
        let stuck = DebounceConfig::default().colors.stuck;

        hold(&mut compositor, button, 4);

        let state = compositor.buttons();
        assert_eq!(state.pressed, 0);
        assert_eq!(state.aborted, button);
        assert_eq!(state.pressed_counter[5], 4);
        assert_eq!(compositor.sink().pixels[5], stuck);

        // Still held: no more counting, no more feedback
        hold(&mut compositor, button, 10);
        assert_eq!(compositor.buttons().pressed_counter[5], 4);
        assert_eq!(compositor.sink().writes_to(5).iter().filter(|c| **c == stuck).count(), 1);

        release_all(&mut compositor);

        let events = compositor.button_events();
        assert_eq!(events.aborted, button);
        assert_eq!(events.short, 0);
        assert_eq!(events.long, 0);
    }

    #[test]
    fn test_acknowledge_clears_events() {
        let mut compositor = compositor_with(&stuck_config());

        hold(&mut compositor, pixel_bit(5), 4);
        release_all(&mut compositor);
        hold(&mut compositor, pixel_bit(6), 1);
        release_all(&mut compositor);

        let events = compositor.button_events();
        assert_eq!(
            events,
            ButtonEvents {
                short: pixel_bit(6),
                long: 0,
                aborted: pixel_bit(5),
            }
        );

        compositor.acknowledge_button_events(events);
        assert!(compositor.button_events().is_empty());

        // The aborted button works again
        hold(&mut compositor, pixel_bit(5), 1);
        release_all(&mut compositor);
        assert_eq!(compositor.button_events().short, pixel_bit(5));
    }

    #[test]
    fn test_press_takes_priority_over_units() {
        let mut compositor = compositor();
        let unit = LightUnit::new(pixel_bit(3), rgb_from_u32(RED));
        compositor.set(1, unit, false, false).unwrap();
        compositor.render_tick();
        assert_eq!(compositor.sink().pixels[3], rgb_from_u32(RED));

        hold(&mut compositor, pixel_bit(3), 1);
        let feedback = compositor.sink().pixels[3];

        let green = LightUnit::new(pixel_bit(3), rgb_from_u32(GREEN));
        compositor.set(1, green, false, false).unwrap();
        compositor.render_tick();

        assert_eq!(compositor.sink().pixels[3], feedback);
        assert!(compositor.cache().is_dirty(3));
        assert_ne!(compositor.active_pixels() & pixel_bit(3), 0);

        release_all(&mut compositor);
        assert_eq!(compositor.sink().pixels[3], OFF);

        compositor.render_tick();
        assert_eq!(compositor.sink().pixels[3], rgb_from_u32(GREEN));
        assert!(!compositor.cache().is_dirty(3));
    }

    #[test]
    fn test_unit_repaints_after_release() {
        let mut compositor = compositor();
        let unit = LightUnit::new(pixel_bit(3), rgb_from_u32(RED));
        compositor.set(1, unit, false, false).unwrap();
        compositor.render_tick();

        hold(&mut compositor, pixel_bit(3), 2);
        compositor.render_tick();
        assert_ne!(compositor.sink().pixels[3], rgb_from_u32(RED));

        release_all(&mut compositor);
        compositor.render_tick();

        assert_eq!(compositor.sink().pixels[3], rgb_from_u32(RED));
    }
}
