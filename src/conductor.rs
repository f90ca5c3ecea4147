//! WatchConductor: bootstrap and change watching
//!
//! The wasm-bindgen surface the content-script glue drives. State machine:
//! Unbootstrapped → Watching. Bootstrap is idempotent because readiness
//! usually signals twice (a manual call plus DOMContentLoaded); only the
//! first one loads settings, evaluates, and installs the observer.
//!
//! # Usage (JavaScript)
//! ```javascript,ignore
//! import init, { WatchConductor } from 'calloutcore';
//!
//! await init();
//! const conductor = new WatchConductor((patch) => chrome.storage.local.set(patch));
//! conductor.bootstrap(await chrome.storage.local.get(null));
//! chrome.storage.onChanged.addListener((changes, area) => {
//!   if (area !== 'local') return; // other persistence areas are not ours
//!   conductor.settingsChanged(changes);
//! });
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{MutationObserver, MutationObserverInit, Node};

use crate::host::web::WebHost;
use crate::log;
use crate::session::WatchSession;
use crate::settings::Settings;

const COMPONENT: &str = "WatchConductor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Fresh instance, neither settings nor observer installed.
    Unbootstrapped,
    /// First evaluation done, mutation observer running.
    Watching,
}

#[wasm_bindgen]
pub struct WatchConductor {
    session: Rc<RefCell<WatchSession<WebHost>>>,
    state: State,
    /// The live observer and the closure keeping its callback alive.
    watcher: Option<(MutationObserver, Closure<dyn FnMut()>)>,
}

#[wasm_bindgen]
impl WatchConductor {
    /// `persist` receives partial settings records (`{uiCollapsed: bool}`)
    /// destined for the settings store; writes are fire-and-forget and the
    /// store's change notification closes the loop.
    #[wasm_bindgen(constructor)]
    pub fn new(persist: js_sys::Function) -> WatchConductor {
        let session = Rc::new_cyclic(|weak| {
            RefCell::new(WatchSession::new(
                WebHost::new(persist, weak.clone()),
                Settings::default(),
            ))
        });
        WatchConductor {
            session,
            state: State::Unbootstrapped,
            watcher: None,
        }
    }

    /// Normalize the stored settings record, run the immediate first
    /// evaluation, then start the mutation watcher. Safe to call more than
    /// once; later calls are ignored.
    pub fn bootstrap(&mut self, stored: JsValue) -> Result<(), JsValue> {
        if self.state == State::Watching {
            log::debug(COMPONENT, "bootstrap ignored, already watching");
            return Ok(());
        }
        // an unreadable record is the same as an empty one
        let value: serde_json::Value =
            serde_wasm_bindgen::from_value(stored).unwrap_or(serde_json::Value::Null);
        {
            let mut session = self.session.borrow_mut();
            session.replace_settings(Settings::from_value(&value));
            session.evaluate();
        }
        self.install_observer()?;
        self.state = State::Watching;
        log::debug(COMPONENT, "bootstrap complete");
        Ok(())
    }

    /// Feed a `{key: {newValue}}` change record from the settings store.
    /// The glue filters for the "local" area before calling.
    #[wasm_bindgen(js_name = settingsChanged)]
    pub fn settings_changed(&self, changes: JsValue) {
        let Ok(value) = serde_wasm_bindgen::from_value::<serde_json::Value>(changes) else {
            log::error(COMPONENT, "unreadable settings change record");
            return;
        };
        self.session.borrow_mut().settings_changed(&value);
    }

    #[wasm_bindgen(js_name = isWatching)]
    pub fn is_watching(&self) -> bool {
        self.state == State::Watching
    }
}

impl WatchConductor {
    fn install_observer(&mut self) -> Result<(), JsValue> {
        // a re-initialized watcher must not leave a duplicate observer
        // firing duplicate evaluations
        if let Some((observer, _callback)) = self.watcher.take() {
            observer.disconnect();
        }
        let weak = Rc::downgrade(&self.session);
        let callback = Closure::wrap(Box::new(move || {
            // one observer batch, however many records, is one request;
            // the debounce absorbs the burst
            if let Some(rc) = weak.upgrade() {
                rc.borrow_mut().mutation_batch();
            }
        }) as Box<dyn FnMut()>);
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document to observe"))?;
        let target: Node = match document.body() {
            Some(body) => body.into(),
            None => document
                .document_element()
                .map(Into::into)
                .ok_or_else(|| JsValue::from_str("no observable root"))?,
        };

        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        init.set_character_data(true);
        observer.observe_with_options(&target, &init)?;

        self.watcher = Some((observer, callback));
        Ok(())
    }
}
