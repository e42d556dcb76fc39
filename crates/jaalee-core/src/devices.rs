// Vendor model code lookup.
//
// The cloud reports a short model code per device; the descriptions
// below are the vendor's published product names.

/// Human-readable model description for a vendor model code.
///
/// Returns `None` for unknown codes; presentation falls back to showing
/// the raw code.
pub fn model_description(code: &str) -> Option<&'static str> {
    match code {
        "F523" => Some(
            "Bluetooth temperature, humidity, pressure, ultraviolet light intensity meter, second generation",
        ),
        "F525" => Some("Bluetooth Temperature and Humidity Monitor"),
        "F526" => Some("Bluetooth Probe Thermometer"),
        "F527" => Some("Wi-Fi Waterproof Probe Temperature and Humidity Monitor"),
        "F528" => Some("Wi-Fi CH₂O Detector"),
        "F530" => Some("Wi-Fi PM2.5 and PM10 Detectors"),
        "F534" => Some("Wi-Fi Type K Thermocouple Thermometer"),
        "F535" => Some("Wi-Fi PT100 Thermometer"),
        "F536" => Some("Wi-Fi CO₂ Detector"),
        "F537" => Some("Wi-Fi Light Intensity Meter"),
        "F538" => Some("Wi-Fi Barometer"),
        "F539" => Some("Wi-Fi Waterproof Probe Temperature and Humidity Monitor 2"),
        "F53A" => Some("Wi-Fi VOC Detector"),
        "F53B" => Some("Wi-Fi TVOC Detector"),
        "F53C" | "F53D" => Some("Wi-Fi O₃ detector"),
        "F53E" => Some("Wi-Fi Positive and Negative Pressure Gauge"),
        "F53F" => Some("Wi-Fi Pressure gauge"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        assert_eq!(
            model_description("F525"),
            Some("Bluetooth Temperature and Humidity Monitor")
        );
        assert_eq!(model_description("F53C"), model_description("F53D"));
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(model_description("F999"), None);
    }
}
