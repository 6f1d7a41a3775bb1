// Turbine reading domain models and wire-format validation
use super::alert::{Alert, AlertKind, AlertModule};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A reading rejected before it reached the store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedReading {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` is not a finite number: {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("field `{field}` must not be negative: {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("invalid timestamp `{0}`")]
    InvalidTimestamp(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nacelle {
    pub yaw: f64,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blades {
    pub pitch: f64,
    pub vibration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Noise {
    pub level: f64,
    pub frequency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weather {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_direction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceInfo {
    pub next_service: String,
    pub operating_hours: f64,
    pub alerts: Vec<Alert>,
}

/// One validated telemetry sample. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub power_output: f64,
    pub wind_speed: f64,
    pub rotor_rpm: f64,
    pub nacelle: Nacelle,
    pub blades: Blades,
    pub noise: Noise,
    pub weather: Weather,
    pub maintenance: MaintenanceInfo,
}

// Wire form: everything optional so that gaps surface as MalformedReading
// instead of a serde error or a NaN.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNacelle {
    pub yaw: Option<f64>,
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBlades {
    pub pitch: Option<f64>,
    pub vibration: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNoise {
    pub level: Option<f64>,
    pub frequency: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWeather {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    #[serde(alias = "wind_direction")]
    pub wind_direction: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    #[serde(default)]
    pub module: Option<AlertModule>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaintenance {
    #[serde(alias = "next_service")]
    pub next_service: Option<String>,
    #[serde(alias = "operating_hours")]
    pub operating_hours: Option<f64>,
    #[serde(default)]
    pub alerts: Vec<RawAlert>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReading {
    pub timestamp: Option<String>,
    #[serde(alias = "power_output")]
    pub power_output: Option<f64>,
    #[serde(alias = "wind_speed")]
    pub wind_speed: Option<f64>,
    #[serde(alias = "rotor_rpm")]
    pub rotor_rpm: Option<f64>,
    #[serde(default)]
    pub nacelle: RawNacelle,
    #[serde(default)]
    pub blades: RawBlades,
    #[serde(default)]
    pub noise: RawNoise,
    #[serde(default)]
    pub weather: RawWeather,
    #[serde(default)]
    pub maintenance: RawMaintenance,
}

fn finite(field: &'static str, value: Option<f64>) -> Result<f64, MalformedReading> {
    let value = value.ok_or(MalformedReading::MissingField(field))?;
    if !value.is_finite() {
        return Err(MalformedReading::NotFinite { field, value });
    }
    Ok(value)
}

fn non_negative(field: &'static str, value: Option<f64>) -> Result<f64, MalformedReading> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(MalformedReading::Negative { field, value });
    }
    Ok(value)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, MalformedReading> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    // Producers such as Python's isoformat() omit the offset; treat as UTC.
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| MalformedReading::InvalidTimestamp(raw.to_string()))
}

impl TryFrom<RawReading> for Reading {
    type Error = MalformedReading;

    fn try_from(raw: RawReading) -> Result<Self, Self::Error> {
        let timestamp = raw
            .timestamp
            .as_deref()
            .ok_or(MalformedReading::MissingField("timestamp"))
            .and_then(parse_timestamp)?;

        // Headline metrics first so the most useful field is reported.
        let power_output = non_negative("powerOutput", raw.power_output)?;
        let wind_speed = non_negative("windSpeed", raw.wind_speed)?;
        let rotor_rpm = non_negative("rotorRpm", raw.rotor_rpm)?;

        let nacelle = Nacelle {
            yaw: finite("nacelle.yaw", raw.nacelle.yaw)?,
            temperature: finite("nacelle.temperature", raw.nacelle.temperature)?,
        };
        let blades = Blades {
            pitch: finite("blades.pitch", raw.blades.pitch)?,
            vibration: finite("blades.vibration", raw.blades.vibration)?,
        };
        let noise = Noise {
            level: finite("noise.level", raw.noise.level)?,
            frequency: finite("noise.frequency", raw.noise.frequency)?,
        };
        let weather = Weather {
            temperature: finite("weather.temperature", raw.weather.temperature)?,
            humidity: finite("weather.humidity", raw.weather.humidity)?,
            pressure: finite("weather.pressure", raw.weather.pressure)?,
            wind_direction: finite("weather.windDirection", raw.weather.wind_direction)?,
        };

        let maintenance = MaintenanceInfo {
            next_service: raw
                .maintenance
                .next_service
                .ok_or(MalformedReading::MissingField("maintenance.nextService"))?,
            operating_hours: non_negative(
                "maintenance.operatingHours",
                raw.maintenance.operating_hours,
            )?,
            alerts: raw
                .maintenance
                .alerts
                .into_iter()
                .map(|alert| embedded_alert(alert, timestamp))
                .collect::<Result<_, _>>()?,
        };

        Ok(Reading {
            timestamp,
            power_output,
            wind_speed,
            rotor_rpm,
            nacelle,
            blades,
            noise,
            weather,
            maintenance,
        })
    }
}

/// Alerts embedded by the backend may omit module and timestamp.
fn embedded_alert(raw: RawAlert, fallback: DateTime<Utc>) -> Result<Alert, MalformedReading> {
    let timestamp = match raw.timestamp.as_deref() {
        Some(ts) => parse_timestamp(ts)?,
        None => fallback,
    };
    Ok(Alert::new(
        raw.id,
        raw.kind,
        raw.message,
        raw.module.unwrap_or(AlertModule::Maintenance),
        timestamp,
    ))
}

impl From<&Reading> for RawReading {
    fn from(reading: &Reading) -> Self {
        RawReading {
            timestamp: Some(reading.timestamp.to_rfc3339()),
            power_output: Some(reading.power_output),
            wind_speed: Some(reading.wind_speed),
            rotor_rpm: Some(reading.rotor_rpm),
            nacelle: RawNacelle {
                yaw: Some(reading.nacelle.yaw),
                temperature: Some(reading.nacelle.temperature),
            },
            blades: RawBlades {
                pitch: Some(reading.blades.pitch),
                vibration: Some(reading.blades.vibration),
            },
            noise: RawNoise {
                level: Some(reading.noise.level),
                frequency: Some(reading.noise.frequency),
            },
            weather: RawWeather {
                temperature: Some(reading.weather.temperature),
                humidity: Some(reading.weather.humidity),
                pressure: Some(reading.weather.pressure),
                wind_direction: Some(reading.weather.wind_direction),
            },
            maintenance: RawMaintenance {
                next_service: Some(reading.maintenance.next_service.clone()),
                operating_hours: Some(reading.maintenance.operating_hours),
                alerts: reading
                    .maintenance
                    .alerts
                    .iter()
                    .map(|alert| RawAlert {
                        id: alert.id.clone(),
                        kind: alert.kind,
                        message: alert.message.clone(),
                        module: Some(alert.module),
                        timestamp: Some(alert.timestamp.to_rfc3339()),
                    })
                    .collect(),
            },
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::baseline;
    use super::*;

    #[test]
    fn test_baseline_validates() {
        let reading = Reading::try_from(baseline()).unwrap();
        assert_eq!(reading.power_output, 2.3);
        assert_eq!(reading.noise.level, 42.3);
        assert_eq!(reading.weather.wind_direction, 245.0);
        assert_eq!(reading.timestamp.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[test]
    fn test_missing_numeric_field_is_rejected() {
        let mut raw = baseline();
        raw.noise.level = None;
        assert_eq!(
            Reading::try_from(raw).unwrap_err(),
            MalformedReading::MissingField("noise.level")
        );

        let mut raw = baseline();
        raw.power_output = None;
        assert_eq!(
            Reading::try_from(raw).unwrap_err(),
            MalformedReading::MissingField("powerOutput")
        );
    }

    #[test]
    fn test_non_finite_and_negative_values_are_rejected() {
        let mut raw = baseline();
        raw.wind_speed = Some(f64::NAN);
        assert!(matches!(
            Reading::try_from(raw),
            Err(MalformedReading::NotFinite { field: "windSpeed", .. })
        ));

        let mut raw = baseline();
        raw.rotor_rpm = Some(-1.0);
        assert_eq!(
            Reading::try_from(raw).unwrap_err(),
            MalformedReading::Negative { field: "rotorRpm", value: -1.0 }
        );
    }

    #[test]
    fn test_backend_shape_is_accepted() {
        // Python isoformat(), snake_case top level, alerts without module/timestamp
        let raw: RawReading = serde_json::from_value(serde_json::json!({
            "timestamp": "2024-02-20T09:30:15.123456",
            "power_output": 2.8,
            "wind_speed": 15.2,
            "rotor_rpm": 22.1,
            "nacelle": { "yaw": 245, "temperature": 65 },
            "blades": { "pitch": 3.2, "vibration": 0.8 },
            "noise": { "level": 48.7, "frequency": 135 },
            "weather": {
                "temperature": 18,
                "humidity": 62,
                "pressure": 1013.2,
                "windDirection": 245
            },
            "maintenance": {
                "nextService": "2024-02-28",
                "operatingHours": 9120,
                "alerts": [{
                    "id": "alert-1",
                    "type": "warning",
                    "message": "Gearbox temperature elevated"
                }]
            }
        }))
        .unwrap();

        let reading = Reading::try_from(raw).unwrap();
        assert_eq!(reading.power_output, 2.8);
        assert_eq!(reading.maintenance.alerts.len(), 1);
        let alert = &reading.maintenance.alerts[0];
        assert_eq!(alert.module, AlertModule::Maintenance);
        assert_eq!(alert.timestamp, reading.timestamp);
    }

    #[test]
    fn test_invalid_timestamp() {
        let mut raw = baseline();
        raw.timestamp = Some("yesterday".to_string());
        assert_eq!(
            Reading::try_from(raw).unwrap_err(),
            MalformedReading::InvalidTimestamp("yesterday".to_string())
        );
    }

    #[test]
    fn test_reading_converts_back_to_wire_form() {
        let reading = Reading::try_from(baseline()).unwrap();
        let again = Reading::try_from(RawReading::from(&reading)).unwrap();
        assert_eq!(reading, again);
    }
}
