//! Decodificador tolerante do payload de telemetria.
//!
//! O host envia um objeto JSON por mensagem (um write BLE ou um pacote
//! UDP). O contrato de parsing é tolerante a campos: cada subcampo é
//! independentemente opcional – ausente ou com tipo errado vira o
//! default zero. Só um payload estruturalmente inválido (não é um
//! objeto JSON) é falha dura.
//!
//! ```text
//! cpu{usage,temp,name} memory{used,total,percent} disk{used,total,percent}
//! network{upload,download} gpu{usage,temp}
//! temperatures{motherboard, disks:[{name,temp},...]}
//! ```

use crate::types::{CPU_NAME_MAX, DISK_NAME_MAX, SystemSample};
use serde_json::Value;

/// Erros de decodificação. Qualquer variante é não-fatal para o loop:
/// a amostra anterior permanece renderizada e a falha só é logada.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Payload não é JSON válido: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload não é um objeto JSON (raiz: {0})")]
    NotAnObject(&'static str),
}

/// Decodifica um payload de texto em [`SystemSample`].
///
/// `now_ms` é o relógio monotônico do monitor (ms desde o boot),
/// carimbado na amostra como instante de captura.
pub fn decode_sample(text: &str, now_ms: u64) -> Result<SystemSample, DecodeError> {
    let root: Value = serde_json::from_str(text)?;
    let obj = root
        .as_object()
        .ok_or_else(|| DecodeError::NotAnObject(json_kind(&root)))?;

    let mut sample = SystemSample::default();

    if let Some(cpu) = obj.get("cpu") {
        sample.cpu.usage = num(cpu, "usage");
        sample.cpu.temp = num(cpu, "temp");
        sample.cpu.name = text_field(cpu, "name", CPU_NAME_MAX);
    }

    if let Some(mem) = obj.get("memory") {
        sample.memory.used = num(mem, "used");
        sample.memory.total = num(mem, "total");
        sample.memory.percent = num(mem, "percent");
    }

    if let Some(disk) = obj.get("disk") {
        sample.disk.used = num(disk, "used");
        sample.disk.total = num(disk, "total");
        sample.disk.percent = num(disk, "percent");
    }

    if let Some(net) = obj.get("network") {
        sample.network.upload = num(net, "upload");
        sample.network.download = num(net, "download");
    }

    if let Some(gpu) = obj.get("gpu") {
        sample.gpu.usage = num(gpu, "usage");
        sample.gpu.temp = num(gpu, "temp");
    }

    if let Some(temps) = obj.get("temperatures") {
        sample.sensors.motherboard_temp = num(temps, "motherboard");

        // Apenas o primeiro disco do array é consumido
        if let Some(first) = temps
            .get("disks")
            .and_then(Value::as_array)
            .and_then(|d| d.first())
        {
            sample.sensors.disk_temp = num(first, "temp");
            sample.sensors.disk_name = text_field(first, "name", DISK_NAME_MAX);
        }
    }

    sample.timestamp_ms = now_ms;
    Ok(sample)
}

/// Extrai um número de `group[key]`, default 0.0 se ausente ou tipo errado.
fn num(group: &Value, key: &str) -> f32 {
    group.get(key).and_then(Value::as_f64).unwrap_or(0.0) as f32
}

/// Extrai uma string de `group[key]`, truncada em `max` bytes.
/// Truncamento respeita fronteira de char UTF-8.
fn text_field(group: &Value, key: &str, max: usize) -> String {
    match group.get(key).and_then(Value::as_str) {
        Some(s) => truncate_to(s, max),
        None => String::new(),
    }
}

fn truncate_to(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_payload_decodes() {
        let json = r#"{
            "cpu": {"usage": 45.5, "temp": 62.0, "name": "Ryzen 7 5800X"},
            "memory": {"used": 12.3, "total": 32.0, "percent": 38.4},
            "disk": {"used": 450.0, "total": 931.5, "percent": 48.3},
            "network": {"upload": 120.5, "download": 3400.2},
            "gpu": {"usage": 80.0, "temp": 71.0},
            "temperatures": {"motherboard": 41.0, "disks": [{"name": "Samsung 970", "temp": 39.0}]}
        }"#;
        let s = decode_sample(json, 1234).unwrap();
        assert_eq!(s.cpu.usage, 45.5);
        assert_eq!(s.cpu.name, "Ryzen 7 5800X");
        assert_eq!(s.memory.percent, 38.4);
        assert_eq!(s.disk.total, 931.5);
        assert_eq!(s.network.download, 3400.2);
        assert_eq!(s.gpu.temp, 71.0);
        assert_eq!(s.sensors.motherboard_temp, 41.0);
        assert_eq!(s.sensors.disk_name, "Samsung 970");
        assert_eq!(s.sensors.disk_temp, 39.0);
        assert_eq!(s.timestamp_ms, 1234);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        // Exemplo do contrato: só cpu.usage, cpu.temp e memory.percent
        let json = r#"{"cpu": {"usage": 55.2, "temp": 61.0}, "memory": {"percent": 40}}"#;
        let s = decode_sample(json, 0).unwrap();
        assert_eq!(s.cpu.usage, 55.2);
        assert_eq!(s.cpu.temp, 61.0);
        assert_eq!(s.memory.percent, 40.0);
        // Todos os demais numéricos = 0
        assert_eq!(s.memory.used, 0.0);
        assert_eq!(s.memory.total, 0.0);
        assert_eq!(s.disk.percent, 0.0);
        assert_eq!(s.network.upload, 0.0);
        assert_eq!(s.gpu.usage, 0.0);
        assert_eq!(s.sensors.motherboard_temp, 0.0);
        assert!(s.cpu.name.is_empty());
    }

    #[test]
    fn type_mismatch_defaults_to_zero() {
        let json = r#"{"cpu": {"usage": "muito", "temp": null}, "memory": "nope"}"#;
        let s = decode_sample(json, 0).unwrap();
        assert_eq!(s.cpu.usage, 0.0);
        assert_eq!(s.cpu.temp, 0.0);
        assert_eq!(s.memory.percent, 0.0);
    }

    #[test]
    fn empty_object_is_all_defaults() {
        let s = decode_sample("{}", 7).unwrap();
        assert_eq!(s, SystemSample {
            timestamp_ms: 7,
            ..Default::default()
        });
    }

    #[test]
    fn non_object_is_hard_failure() {
        assert!(matches!(
            decode_sample("[1,2,3]", 0),
            Err(DecodeError::NotAnObject("array"))
        ));
        assert!(matches!(
            decode_sample("42", 0),
            Err(DecodeError::NotAnObject("number"))
        ));
        assert!(matches!(decode_sample("{trunca", 0), Err(DecodeError::Json(_))));
    }

    #[test]
    fn only_first_disk_entry_is_consumed() {
        let json = r#"{"temperatures": {"disks": [
            {"name": "nvme0", "temp": 35.0},
            {"name": "sda", "temp": 48.0}
        ]}}"#;
        let s = decode_sample(json, 0).unwrap();
        assert_eq!(s.sensors.disk_name, "nvme0");
        assert_eq!(s.sensors.disk_temp, 35.0);
    }

    #[test]
    fn long_names_are_truncated_not_rejected() {
        let long = "X".repeat(200);
        let json = format!(r#"{{"cpu": {{"name": "{long}"}}}}"#);
        let s = decode_sample(&json, 0).unwrap();
        assert_eq!(s.cpu.name.len(), CPU_NAME_MAX);

        let json = format!(r#"{{"temperatures": {{"disks": [{{"name": "{long}", "temp": 1.0}}]}}}}"#);
        let s = decode_sample(&json, 0).unwrap();
        assert_eq!(s.sensors.disk_name.len(), DISK_NAME_MAX);
    }

    #[test]
    fn truncation_respects_char_boundary() {
        // "ç" tem 2 bytes; corte no meio do char deve recuar
        let name = format!("{}ç", "a".repeat(63));
        let json = format!(r#"{{"cpu": {{"name": "{name}"}}}}"#);
        let s = decode_sample(&json, 0).unwrap();
        assert_eq!(s.cpu.name, "a".repeat(63));
    }
}
