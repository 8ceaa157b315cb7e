//! Nissan Leaf configuration forms.
//!
//! Two schemas share the `xnl` namespace:
//!
//! | Schema | Covers |
//! |--------|--------|
//! | `features` | model year, cabin temperature offset, EV request pin, battery capacity references, CAN write access |
//! | `battery` | charge control thresholds and V2X discharge limits |

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::field::{Derivation, FieldKind, FieldSpec};
use crate::schema::{Schema, SchemaRegistry};

/// Store namespace of every Leaf parameter.
pub const NAMESPACE: &str = "xnl";

/// Name of the feature configuration schema.
pub const FEATURES: &str = "features";

/// Name of the battery setup schema.
pub const BATTERY: &str = "battery";

/// Selectable outputs for the EV SYSTEM ACTIVATION REQUEST signal:
/// `1` is `SW_12V` (DA26 pin 18), `3`…`9` are `EGPIO_2`…`EGPIO_8`.
pub const EV_REQUEST_PORTS: [&str; 8] = ["1", "3", "4", "5", "6", "7", "8", "9"];

/// Range estimation methods used for the sufficient-range threshold.
pub const RANGE_CALC_METHODS: [&str; 2] = ["ideal", "est"];

/// Usable capacity references of the factory battery packs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryPreset {
    /// Gen 1, 24 kWh.
    Gen1_24,
    /// Gen 1, 30 kWh.
    Gen1_30,
    /// Gen 2, 40 kWh.
    Gen2_40,
}

impl BatteryPreset {
    /// GIDs reported by a new pack when fully charged.
    #[must_use]
    pub fn new_car_gids(self) -> u32 {
        match self {
            Self::Gen1_24 => 281,
            Self::Gen1_30 => 356,
            Self::Gen2_40 => 502,
        }
    }

    /// Usable capacity of a new pack in Ah.
    #[must_use]
    pub fn new_car_ah(self) -> u32 {
        match self {
            Self::Gen1_24 => 66,
            Self::Gen1_30 => 79,
            Self::Gen2_40 => 115,
        }
    }
}

/// Defaults of the `features` schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafDefaults {
    pub model_year: i64,
    /// Cabin temperature sensor offset in °C.
    pub cabin_temp_offset: f64,
    pub ev_request_port: String,
    pub max_gids: u32,
    pub new_car_ah: u32,
}

impl LeafDefaults {
    /// Defaults with capacity references taken from `preset`.
    #[must_use]
    pub fn for_preset(preset: BatteryPreset) -> Self {
        Self {
            max_gids: preset.new_car_gids(),
            new_car_ah: preset.new_car_ah(),
            ..Self::default()
        }
    }
}

impl Default for LeafDefaults {
    fn default() -> Self {
        Self {
            model_year: 2012,
            cabin_temp_offset: 0.0,
            ev_request_port: "1".to_string(),
            max_gids: BatteryPreset::Gen1_24.new_car_gids(),
            new_car_ah: BatteryPreset::Gen1_24.new_car_ah(),
        }
    }
}

/// Build the `features` schema.
///
/// # Errors
///
/// Returns [`SchemaError::DefaultNotAnOption`] when
/// `defaults.ev_request_port` is not one of [`EV_REQUEST_PORTS`].
pub fn features_schema(defaults: &LeafDefaults) -> Result<Schema, SchemaError> {
    Schema::builder(FEATURES, NAMESPACE)
        .title("Nissan Leaf feature configuration")
        .field(
            FieldSpec::builder("modelyear")
                .label("Model year")
                .kind(FieldKind::integer_at_least(2011))
                .default_value(defaults.model_year.to_string())
                .range_message("Model year must be ≥ 2011")
                .build()?,
        )
        .field(
            FieldSpec::builder("cabintempoffset")
                .label("Cabin Temperature Offset")
                .kind(FieldKind::float())
                .default_value(defaults.cabin_temp_offset.to_string())
                .required()
                .empty_message("Cabin Temperature Offset can not be empty")
                .build()?,
        )
        .field(
            FieldSpec::builder("cfg_ev_request_port")
                .label("EV SYSTEM ACTIVATION REQUEST Pin field")
                .kind(FieldKind::choice(EV_REQUEST_PORTS))
                .default_value(defaults.ev_request_port.clone())
                .required()
                .build()?,
        )
        .field(
            FieldSpec::builder("maxGids")
                .input("maxgids")
                .label("Maximum GIDS")
                .kind(FieldKind::integer())
                .default_value(defaults.max_gids.to_string())
                .build()?,
        )
        .field(
            FieldSpec::builder("newCarAh")
                .input("newcarah")
                .label("New car capacity")
                .kind(FieldKind::integer())
                .default_value(defaults.new_car_ah.to_string())
                .build()?,
        )
        .field(
            FieldSpec::builder("soc.newcar")
                .input("socnewcar")
                .label("SOC Display")
                .kind(FieldKind::Boolean)
                .default_flag(false)
                .build()?,
        )
        .field(
            FieldSpec::builder("soh.newcar")
                .input("sohnewcar")
                .label("SOH Display")
                .kind(FieldKind::Boolean)
                .default_flag(false)
                .build()?,
        )
        .field(
            FieldSpec::builder("canwrite")
                .label("Enable CAN writes")
                .kind(FieldKind::Boolean)
                .default_flag(false)
                .build()?,
        )
        .build()
}

/// Build the `battery` schema.
///
/// # Errors
///
/// Never fails for the built-in definition; the `Result` carries the
/// builder's invariant checks.
pub fn battery_schema() -> Result<Schema, SchemaError> {
    let at_least_zero = |key: &str, label: &str| {
        FieldSpec::builder(key)
            .label(label)
            .kind(FieldKind::float_at_least(0.0))
            .default_value("0")
            .build()
    };
    let percent = |key: &str, label: &str| {
        FieldSpec::builder(key)
            .label(label)
            .kind(FieldKind::float_between(0.0, 100.0))
            .default_value("0")
            .build()
    };

    Schema::builder(BATTERY, NAMESPACE)
        .title("Nissan Leaf battery setup")
        .field(at_least_zero("suffrange", "Sufficient range")?)
        .field(
            FieldSpec::builder("suffrangecalc")
                .label("Sufficient range estimation method")
                .kind(FieldKind::choice(RANGE_CALC_METHODS))
                .default_value("ideal")
                .build()?,
        )
        .field(percent("suffsoc", "Sufficient SOC")?)
        .field(at_least_zero("rangedrop", "Allowed range drop")?)
        .field(percent("socdrop", "Allowed SOC drop")?)
        .field(at_least_zero("minrange", "Minimum range")?)
        .field(percent("minsoc", "Minimum SOC")?)
        .field(
            FieldSpec::builder("autocharge")
                .input("chgnoteonly")
                .label("Notify only")
                .kind(FieldKind::Boolean)
                .derived(Derivation::Negate)
                .default_flag(true)
                .build()?,
        )
        .build()
}

/// Registry holding both Leaf schemas.
///
/// # Errors
///
/// Propagates [`SchemaError`] from [`features_schema`].
pub fn registry(defaults: &LeafDefaults) -> Result<SchemaRegistry, SchemaError> {
    let mut registry = SchemaRegistry::new();
    registry.register(features_schema(defaults)?)?;
    registry.register(battery_schema()?)?;
    Ok(registry)
}
