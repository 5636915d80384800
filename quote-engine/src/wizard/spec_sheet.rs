//! Motor Spec Sheet Lookup
//!
//! Derives the spec sheet from the model code printed on the cowling,
//! e.g. "115 ELPT CT" or "9.9 MH":
//!
//! | Code | Meaning |
//! |------|---------|
//! | M / E | manual / electric start |
//! | S / L / XL / XXL | 15" / 20" / 25" / 30" shaft |
//! | H | tiller handle |
//! | PT | power trim |
//! | CT | Command Thrust gearcase |

use shared::models::{CatalogItem, ControlType, MotorSpecs, StartingType};

/// Tillers at or below this output carry an integrated fuel tank
const INTEGRATED_TANK_MAX_HP: f64 = 6.0;
/// Motors at or below this output are always tiller-steered
const TILLER_ONLY_MAX_HP: f64 = 6.0;
/// Above this output a missing start letter means electric start
const ELECTRIC_DEFAULT_MIN_HP: f64 = 30.0;

const SHAFT_CODES: [(&str, u8); 4] = [("XXL", 30), ("XL", 25), ("L", 20), ("S", 15)];

#[derive(Debug, Default, PartialEq)]
struct RigCode {
    starting: Option<StartingType>,
    shaft_inches: Option<u8>,
    tiller: bool,
    power_trim: bool,
    command_thrust: bool,
}

fn is_horsepower_figure(token: &str) -> bool {
    token.parse::<f64>().is_ok()
}

/// Parse the letters following the horsepower figure
///
/// Words before the figure ("Mercury 115 ELPT") are brand or series
/// names; without a figure every word is treated as rig code.
fn parse_rig_code(model: &str) -> RigCode {
    let mut code = RigCode::default();
    let words: Vec<&str> = model.split_whitespace().collect();
    let start = words
        .iter()
        .position(|w| is_horsepower_figure(w))
        .map_or(0, |i| i + 1);
    let tokens: Vec<String> = words[start..]
        .iter()
        .filter(|w| !is_horsepower_figure(w))
        .map(|w| w.to_uppercase())
        .collect();

    if let Some(first) = tokens.first() {
        let mut rest = first.as_str();

        if let Some(r) = rest.strip_prefix('M') {
            code.starting = Some(StartingType::Manual);
            rest = r;
        } else if let Some(r) = rest.strip_prefix('E') {
            code.starting = Some(StartingType::Electric);
            rest = r;
        }

        for (prefix, inches) in SHAFT_CODES {
            if let Some(r) = rest.strip_prefix(prefix) {
                code.shaft_inches = Some(inches);
                rest = r;
                break;
            }
        }

        if let Some(r) = rest.strip_prefix('H') {
            code.tiller = true;
            rest = r;
        }

        code.power_trim = rest.contains("PT");
    }

    code.command_thrust = tokens.iter().any(|t| t == "CT" || t.ends_with("CT"));
    code.power_trim |= tokens.iter().skip(1).any(|t| t == "PT");
    code
}

/// Look up the spec sheet for a catalog motor
pub fn lookup(item: &CatalogItem) -> MotorSpecs {
    let code = parse_rig_code(&item.model);
    let hp = item.horsepower;

    let control = if code.tiller || hp <= TILLER_ONLY_MAX_HP {
        ControlType::Tiller
    } else {
        ControlType::Remote
    };
    let starting = code.starting.unwrap_or(if hp > ELECTRIC_DEFAULT_MIN_HP {
        StartingType::Electric
    } else {
        StartingType::Manual
    });
    let shaft_inches = code
        .shaft_inches
        .unwrap_or(if hp < 25.0 { 15 } else { 20 });

    MotorSpecs {
        starting,
        control,
        shaft_inches,
        power_trim: code.power_trim,
        command_thrust: code.command_thrust,
        integrated_fuel_tank: control == ControlType::Tiller && hp <= INTEGRATED_TANK_MAX_HP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(model: &str, horsepower: f64) -> CatalogItem {
        CatalogItem {
            id: 1,
            model: model.to_string(),
            base_price: 1000.0,
            sale_price: None,
            category: "outboard".to_string(),
            horsepower,
            motor_type: "FourStroke".to_string(),
            in_stock: true,
        }
    }

    #[test]
    fn test_remote_power_trim_command_thrust() {
        let specs = lookup(&item("115 ELPT CT", 115.0));
        assert_eq!(specs.starting, StartingType::Electric);
        assert_eq!(specs.control, ControlType::Remote);
        assert_eq!(specs.shaft_inches, 20);
        assert!(specs.power_trim);
        assert!(specs.command_thrust);
        assert!(!specs.integrated_fuel_tank);
    }

    #[test]
    fn test_small_manual_tiller() {
        let specs = lookup(&item("2.5 MH", 2.5));
        assert_eq!(specs.starting, StartingType::Manual);
        assert!(specs.is_tiller());
        assert_eq!(specs.shaft_inches, 15);
        assert!(specs.integrated_fuel_tank);
    }

    #[test]
    fn test_long_shaft_tiller_with_external_tank() {
        let specs = lookup(&item("9.9 ELH", 9.9));
        assert_eq!(specs.starting, StartingType::Electric);
        assert!(specs.is_tiller());
        assert_eq!(specs.shaft_inches, 20);
        assert!(!specs.integrated_fuel_tank);
    }

    #[test]
    fn test_extra_long_shaft_codes() {
        assert_eq!(lookup(&item("150 EXLPT", 150.0)).shaft_inches, 25);
        assert_eq!(lookup(&item("300 XXL", 300.0)).shaft_inches, 30);
    }

    #[test]
    fn test_missing_start_letter_defaults_by_horsepower() {
        assert_eq!(lookup(&item("200 XL", 200.0)).starting, StartingType::Electric);
        assert_eq!(lookup(&item("20 L", 20.0)).starting, StartingType::Manual);
    }

    #[test]
    fn test_lowercase_model_code() {
        let specs = lookup(&item("25 elhpt", 25.0));
        assert!(specs.is_tiller());
        assert!(specs.power_trim);
        assert_eq!(specs.shaft_inches, 20);
    }

    #[test]
    fn test_brand_prefix_before_horsepower_is_ignored() {
        let specs = lookup(&item("Mercury 115 ELPT", 115.0));
        assert_eq!(specs.starting, StartingType::Electric);
        assert_eq!(specs.control, ControlType::Remote);
        assert!(specs.power_trim);

        let specs = lookup(&item("Mercury 9.9 MLH", 9.9));
        assert_eq!(specs.starting, StartingType::Manual);
        assert!(specs.is_tiller());
        assert_eq!(specs.shaft_inches, 20);
    }
}
