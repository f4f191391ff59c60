use proptest::prelude::*;
use serde_json::{json, Value};
use tinct_customize::Sanitizer;
use tinct_schema::{InputAttrs, SettingDefinition, SettingType};

fn width() -> SettingDefinition {
    SettingDefinition::new(SettingType::Range, "Content width")
        .with_default(720)
        .with_input_attrs(InputAttrs::new(480.0, 1200.0, 10.0))
}

fn layout() -> SettingDefinition {
    SettingDefinition::new(SettingType::Select, "Archive layout")
        .with_default("list")
        .with_choices([("list", "List"), ("grid", "Grid"), ("masonry", "Masonry")])
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(|n| json!(n)),
        "[a-z0-9#. -]{0,12}".prop_map(Value::from),
        Just(Value::Null),
    ]
}

proptest! {
    #[test]
    fn numbers_stay_within_bounds(input in scalar()) {
        let out = Sanitizer::Number.sanitize(&input, &width());
        let n = out.as_f64().expect("number sanitizer yields a number");
        prop_assert!((480.0..=1200.0).contains(&n), "{} out of range", n);
    }

    #[test]
    fn choices_always_yield_a_declared_key(input in scalar()) {
        let def = layout();
        let out = Sanitizer::Choice.sanitize(&input, &def);
        let key = out.as_str().expect("choice sanitizer yields a string");
        prop_assert!(def.choices.contains_key(key));
    }

    #[test]
    fn sanitizing_is_idempotent(input in scalar()) {
        for (sanitizer, def) in [(Sanitizer::Number, width()), (Sanitizer::Choice, layout())] {
            let once = sanitizer.sanitize(&input, &def);
            let twice = sanitizer.sanitize(&once, &def);
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn hex_colors_are_valid_or_default(input in "#?[0-9a-fA-Fxz]{0,7}") {
        let def = SettingDefinition::new(SettingType::Color, "Primary").with_default("#336699");
        let out = Sanitizer::HexColor.sanitize(&Value::from(input), &def);
        let color = out.as_str().expect("color sanitizer yields a string");
        prop_assert!(
            color.is_empty()
                || (color.starts_with('#')
                    && matches!(color.len(), 4 | 7)
                    && color[1..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()))
        );
    }
}
