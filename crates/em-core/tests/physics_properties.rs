//! Property tests for the physics models.

use em_core::{
    ConnectionState, ConnectionValidated, Element, ElementId, ElementKind, FieldStyle, HasPoles,
    LampPolarity, MagnetStyle, PendulumState, PhysicsConfig, Point, Poles, Size, ambient_poles,
    bearing, compute_current, generate_field, update_poles,
};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    -2000.0f64..2000.0
}

fn extent() -> impl Strategy<Value = f64> {
    1.0f64..600.0
}

// =============================================================================
// Poles
// =============================================================================

proptest! {
    #[test]
    fn axial_poles_are_distinct_and_swap(
        x in coord(), y in coord(), w in extent(), h in extent(),
    ) {
        let forward = update_poles(Point::new(x, y), Size::new(w, h), false);
        let reversed = update_poles(Point::new(x, y), Size::new(w, h), true);
        prop_assert_ne!(forward.pole_n, forward.pole_s);
        prop_assert_eq!(forward.pole_n, reversed.pole_s);
        prop_assert_eq!(forward.pole_s, reversed.pole_n);
        prop_assert_eq!(forward.pole_n.y, y + h / 2.0);
    }

    #[test]
    fn ambient_poles_sit_on_top_and_bottom_edges(
        x in coord(), y in coord(), w in extent(), h in extent(), inset in 1.0f64..100.0,
    ) {
        let poles = ambient_poles(Point::new(x, y), Size::new(w, h), inset, false);
        prop_assert_eq!(poles.pole_n.y, y + h);
        prop_assert_eq!(poles.pole_s.y, y);
        prop_assert!(poles.pole_n.x < poles.pole_s.x);
    }
}

proptest! {
    #[test]
    fn pole_rules_are_repeatable(
        x in coord(), y in coord(), w in extent(), h in extent(),
        inset in 1.0f64..100.0, reversed in any::<bool>(),
    ) {
        let (at, size) = (Point::new(x, y), Size::new(w, h));
        prop_assert_eq!(update_poles(at, size, reversed), update_poles(at, size, reversed));
        prop_assert_eq!(
            ambient_poles(at, size, inset, reversed),
            ambient_poles(at, size, inset, reversed)
        );
    }

    #[test]
    fn refreshing_element_poles_twice_changes_nothing(
        x in coord(), y in coord(), w in extent(), h in extent(),
        reversed in any::<bool>(), earth in any::<bool>(),
    ) {
        let config = PhysicsConfig::default();
        let style = if earth { MagnetStyle::Earth } else { MagnetStyle::Bar };
        let mut magnet = Element::new(
            ElementId::intern("prop_refresh"),
            ElementKind::Magnet(style),
            Point::new(x, y),
            &config,
        );
        magnet.size = Size::new(w, h);
        magnet.reversed = reversed;

        let first = magnet.refresh_poles();
        let second = magnet.refresh_poles();
        prop_assert!(first.is_some());
        prop_assert_eq!(first, second);
        prop_assert_eq!(magnet.poles(), second);
    }
}

// =============================================================================
// Fields
// =============================================================================

proptest! {
    #[test]
    fn field_size_depends_only_on_style(
        x in coord(), y in coord(), w in extent(), h in extent(), reversed in any::<bool>(),
    ) {
        let config = PhysicsConfig::default();
        let poles = update_poles(Point::new(x, y), Size::new(w, h), reversed);
        let bar = generate_field(poles, reversed, h, FieldStyle::Bar, &config);
        let ambient = generate_field(poles, reversed, h, FieldStyle::Ambient, &config);
        prop_assert_eq!(bar.len(), 12);
        prop_assert_eq!(ambient.len(), 10);
        prop_assert!(bar.iter().take(10).all(|d| d.is_arc()));
        prop_assert!(!bar[10].is_arc() && !bar[11].is_arc());
    }
}

// =============================================================================
// Pendulum
// =============================================================================

proptest! {
    #[test]
    fn pendulum_offset_never_exceeds_max_swing(
        forces in prop::collection::vec(-1e6f64..1e6, 1..64),
    ) {
        let config = PhysicsConfig::default();
        let mut state = PendulumState::default();
        for force in forces {
            let offset = state.integrate(force, &config);
            prop_assert!(offset.abs() <= config.max_swing);
        }
    }

    #[test]
    fn pendulum_steps_stay_finite(
        dx in -500.0f64..500.0, dy in -500.0f64..500.0,
    ) {
        let config = PhysicsConfig::default();
        let mut state = PendulumState::default();
        let own = Poles { pole_n: Point::new(220.0, 25.0), pole_s: Point::new(0.0, 25.0) };
        // Driver may sit exactly on top of the hanging magnet.
        let driver = Poles {
            pole_n: Point::new(220.0 + dx, 25.0 + dy),
            pole_s: Point::new(dx, 25.0 + dy),
        };
        let next = state.step(Point::new(0.0, 0.0), 300.0, own, Point::new(100.0, -50.0), driver, &config);
        prop_assert!(next.x.is_finite());
        prop_assert!((next.x - state.center_point).abs() <= config.max_swing);
    }
}

// =============================================================================
// Compass, current, lamps
// =============================================================================

proptest! {
    #[test]
    fn bearing_is_normalised(
        cx in coord(), cy in coord(), tx in coord(), ty in coord(),
    ) {
        let angle = bearing(Point::new(cx, cy), Point::new(tx, ty));
        prop_assert!((0.0..360.0).contains(&angle), "angle={}", angle);
    }

    #[test]
    fn current_magnitude_equals_speed(
        speed in -5000.0f64..5000.0,
        nx in coord(), sx in coord(), rx in coord(),
    ) {
        let current = compute_current(speed, Point::new(nx, 0.0), Point::new(sx, 0.0), Point::new(rx, 0.0));
        prop_assert_eq!(current.abs(), speed.abs());
    }

    #[test]
    fn complementary_lamps_never_both_lit(
        current in -100.0f64..100.0, connected in any::<bool>(),
    ) {
        let forward = LampPolarity::Forward.is_lit(current, connected);
        let reverse = LampPolarity::Reverse.is_lit(current, connected);
        prop_assert!(!(forward && reverse));
    }
}

// =============================================================================
// Connection latch
// =============================================================================

proptest! {
    #[test]
    fn latch_closes_once_and_stays_closed(
        terminals in 1u32..4, links in 0usize..10,
    ) {
        let me = ElementId::intern("latch_me");
        let other = ElementId::intern("latch_other");
        let link = ConnectionValidated::new(me, other);
        let mut state = ConnectionState::new(terminals);
        let mut closed = 0;
        for _ in 0..links {
            if state.on_link_validated(me, &link) {
                closed += 1;
            }
        }
        prop_assert_eq!(state.is_connected, links >= terminals as usize);
        prop_assert_eq!(closed, usize::from(links >= terminals as usize));
    }
}
