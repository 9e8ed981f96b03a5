mod support;

mod tests {
    use trellis_light_units::color::rgb_from_u32;
    use trellis_light_units::grid::pixel_bit;
    use trellis_light_units::{
        CommandQueue, Duration, Instant, LightCommand, SetCommand, SplitMix64, TickScheduler,
        TickTimings, UnitPatch,
    };

    use crate::support::{FakeInput, RecordingSink, compositor};

    type Scheduler<'a> = TickScheduler<'a, RecordingSink, FakeInput, SplitMix64, 16, 4>;

    #[test]
    fn test_first_tick_runs_both() {
        let mut scheduler: Scheduler<'_> = TickScheduler::new(compositor());

        let result = scheduler.tick(Instant::from_millis(0)).unwrap();

        assert_eq!(result.fast_ticks, 1);
        assert_eq!(result.render_ticks, 1);
        assert_eq!(result.next_deadline, Instant::from_millis(20));
        assert_eq!(result.sleep_duration, Duration::from_millis(20));
        assert_eq!(scheduler.compositor().render_ticks(), 1);
    }

    #[test]
    fn test_catches_up_small_backlog() {
        let mut scheduler: Scheduler<'_> = TickScheduler::new(compositor());
        scheduler.tick(Instant::from_millis(0)).unwrap();

        let result = scheduler.tick(Instant::from_millis(40)).unwrap();

        assert_eq!(result.fast_ticks, 2);
        assert_eq!(result.render_ticks, 0);
        assert_eq!(result.next_deadline, Instant::from_millis(60));
        assert_eq!(result.sleep_duration, Duration::from_millis(20));
    }

    #[test]
    fn test_skips_large_backlog() {
        let mut scheduler: Scheduler<'_> = TickScheduler::new(compositor());
        scheduler.tick(Instant::from_millis(0)).unwrap();

        let result = scheduler.tick(Instant::from_millis(1000)).unwrap();

        assert_eq!(result.fast_ticks, 1);
        assert_eq!(result.render_ticks, 1);
        assert_eq!(result.next_deadline, Instant::from_millis(1020));
    }

    #[test]
    fn test_custom_timings() {
        let timings = TickTimings {
            fast: Duration::from_millis(10),
            render: Duration::from_millis(50),
        };
        let mut scheduler: Scheduler<'_> = TickScheduler::with_timings(compositor(), timings);
        scheduler.tick(Instant::from_millis(0)).unwrap();

        let result = scheduler.tick(Instant::from_millis(50)).unwrap();

        assert_eq!(result.fast_ticks, 1);
        assert_eq!(result.render_ticks, 1);
        assert_eq!(result.next_deadline, Instant::from_millis(60));
    }

    #[test]
    fn test_commands_apply_before_render() {
        let queue = CommandQueue::<4>::new();
        let mut scheduler: Scheduler<'_> =
            TickScheduler::new(compositor()).with_commands(queue.receiver());

        let command = LightCommand::Set(SetCommand {
            id: 1,
            patch: UnitPatch {
                pixel_mask: Some(pixel_bit(9)),
                color: Some(0x00_FF00),
                ..UnitPatch::default()
            },
            rm_before_add: false,
        });
        queue.try_send(command).unwrap();

        scheduler.tick(Instant::from_millis(0)).unwrap();
        assert!(scheduler.compositor().exists(1).is_some());
        assert_eq!(
            scheduler.compositor().sink().pixels[9],
            rgb_from_u32(0x00_FF00)
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_fast_ticks_sample_buttons() {
        let mut scheduler: Scheduler<'_> = TickScheduler::new(compositor());
        scheduler.compositor_mut().input_mut().raw = pixel_bit(2);

        scheduler.tick(Instant::from_millis(0)).unwrap();
        scheduler.tick(Instant::from_millis(20)).unwrap();
        scheduler.compositor_mut().input_mut().raw = 0;
        scheduler.tick(Instant::from_millis(40)).unwrap();

        assert_eq!(scheduler.compositor().button_events().short, pixel_bit(2));
    }
}
