use engine::api::{resolve, ResolveConfig};
use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;
use serde::Serialize;

const VERSION: &str = "check-ffi 0.1.0";

#[derive(Serialize)]
#[serde(untagged)]
enum Envelope {
    Ok { ok: bool, result: serde_json::Value },
    Err { ok: bool, error: String },
}

fn ok_json(value: serde_json::Value) -> String {
    render(Envelope::Ok {
        ok: true,
        result: value,
    })
}

fn err_json(e: impl std::fmt::Display) -> String {
    render(Envelope::Err {
        ok: false,
        error: e.to_string(),
    })
}

fn render(envelope: Envelope) -> String {
    serde_json::to_string(&envelope)
        .unwrap_or_else(|_| r#"{"ok":false,"error":"serialization_failed"}"#.to_string())
}

fn to_jstring(env: &JNIEnv, s: String) -> jstring {
    match env.new_string(s) {
        Ok(js) => js.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Resolve a check described by a JSON `ResolveConfig` (inline `character`
/// and `request`) and return the `{ok, result|error}` envelope.
pub fn resolve_internal(input: &str) -> String {
    let cfg: ResolveConfig = match serde_json::from_str(input) {
        Ok(c) => c,
        Err(e) => return err_json(format!("invalid_config: {}", e)),
    };
    if cfg.character_path.is_some() || cfg.request_path.is_some() {
        return err_json("invalid_config: file paths are not accepted over FFI");
    }
    let report = match resolve(cfg) {
        Ok(r) => r,
        Err(e) => return err_json(e),
    };
    let result = serde_json::json!({
        "player_roll": report.player_roll,
        "resolution": report.resolution,
        "log": report.log,
    });
    ok_json(result)
}

#[no_mangle]
pub extern "system" fn Java_com_checkengine_Ffi_version<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jstring {
    to_jstring(&env, VERSION.to_string())
}

#[no_mangle]
pub extern "system" fn Java_com_checkengine_Ffi_resolveCheckJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    let input: String = match env.get_string(&json) {
        Ok(s) => s.into(),
        Err(e) => return to_jstring(&env, err_json(e)),
    };
    let out = resolve_internal(&input);
    to_jstring(&env, out)
}
