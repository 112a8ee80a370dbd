use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Writes `text` through `navigator.clipboard.writeText`.
///
/// Fails when the page has no clipboard access; callers then fall back to the
/// backend copy.
pub async fn write_text(text: &str) -> Result<(), String> {
    let navigator = property(&js_sys::global(), "navigator")?;
    let clipboard = property(&navigator, "clipboard")?;
    let write: Function = property(&clipboard, "writeText")?
        .dyn_into()
        .map_err(|_| "clipboard.writeText is not a function".to_string())?;
    let promise: Promise = write
        .call1(&clipboard, &JsValue::from_str(text))
        .map_err(|e| format!("writeText threw: {e:?}"))?
        .dyn_into()
        .map_err(|_| "writeText did not return a promise".to_string())?;
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| format!("writeText rejected: {e:?}"))
}

fn property(target: &JsValue, name: &str) -> Result<JsValue, String> {
    let value = Reflect::get(target, &JsValue::from_str(name))
        .map_err(|e| format!("failed to read {name}: {e:?}"))?;
    if value.is_undefined() || value.is_null() {
        return Err(format!("{name} is unavailable"));
    }
    Ok(value)
}
