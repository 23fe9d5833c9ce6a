//! Browser bindings. The UI sends point clicks and configuration here and
//! renders the returned `GameView`.

use wasm_bindgen::prelude::*;

use crate::game::GameSession;
use crate::mode::{Mode, ModeConfig};
use crate::types::Color;

#[wasm_bindgen]
pub struct MillGame {
    session: GameSession,
}

#[wasm_bindgen]
impl MillGame {
    /// Starts a game on built-in mode `mode_key` ("m32" or "m9").
    #[wasm_bindgen(constructor)]
    pub fn new(mode_key: &str, starter: &str) -> Result<MillGame, JsError> {
        let mode = Mode::builtin(mode_key)?;
        let starter: Color = starter.parse()?;
        Ok(Self {
            session: GameSession::new(mode, starter)?,
        })
    }

    /// Activates point `idx` and returns the resulting view.
    /// Illegal clicks leave the game unchanged; the view's `lastAction` tells
    /// the UI what happened.
    pub fn click(&mut self, idx: u32) -> Result<JsValue, JsError> {
        self.session.click(idx as usize);
        self.view()
    }

    pub fn view(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.session.to_view())?)
    }

    pub fn restart(&mut self, starter: &str) -> Result<JsValue, JsError> {
        let starter: Color = starter.parse()?;
        self.session.reset(starter, None)?;
        self.view()
    }

    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&mut self, mode_key: &str, starter: &str) -> Result<JsValue, JsError> {
        let mode = Mode::builtin(mode_key)?;
        let starter: Color = starter.parse()?;
        self.session.reset(starter, Some(mode))?;
        self.view()
    }

    /// Switches to a custom mode: `{ name?, rings, distances, piecesPerSide }`.
    pub fn configure(&mut self, config: JsValue, starter: &str) -> Result<JsValue, JsError> {
        let config: ModeConfig = serde_wasm_bindgen::from_value(config)?;
        let mode = Mode::custom(config)?;
        let starter: Color = starter.parse()?;
        self.session.reset(starter, Some(mode))?;
        self.view()
    }

    /// Point positions, adjacency lists and mills of the active board.
    pub fn topology(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(
            &self.session.topology().to_view(),
        )?)
    }

    #[wasm_bindgen(getter, js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.session.outcome().is_some()
    }
}

/// Built-in modes for the mode picker.
#[wasm_bindgen]
pub fn modes() -> Result<JsValue, JsError> {
    Ok(serde_wasm_bindgen::to_value(Mode::builtins())?)
}
