use gloo::timers::callback::Timeout;
use kulki_core::{SoundCue, SoundPlayer};
use std::cell::Cell;
use std::rc::Rc;
use web_sys::{AudioContext, AudioContextState, OscillatorType};

/// WebAudio tone synth for the session's cue set. Every cue is a short
/// oscillator envelope; an unavailable or failing context degrades to
/// silence without touching game logic.
#[derive(Debug)]
pub(crate) struct WebAudio {
    ctx: Option<AudioContext>,
    muted: Cell<bool>,
}

impl WebAudio {
    pub(crate) fn new(muted: bool) -> Rc<Self> {
        let ctx = match AudioContext::new() {
            Ok(ctx) => Some(ctx),
            Err(err) => {
                log::warn!("audio unavailable: {:?}", err);
                None
            }
        };
        Rc::new(Self {
            ctx,
            muted: Cell::new(muted),
        })
    }

    pub(crate) fn set_muted(&self, muted: bool) {
        self.muted.set(muted);
    }

    pub(crate) fn is_muted(&self) -> bool {
        self.muted.get()
    }

    fn tone(&self, freq: f32, shape: OscillatorType, duration: f64, volume: f32) {
        if self.muted.get() {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // browsers suspend fresh contexts until a user gesture
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let now = ctx.current_time();
        let played = (|| -> Result<(), wasm_bindgen::JsValue> {
            let osc = ctx.create_oscillator()?;
            let gain = ctx.create_gain()?;

            osc.set_type(shape);
            osc.frequency().set_value_at_time(freq, now)?;

            gain.gain().set_value_at_time(volume, now)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, now + duration)?;

            osc.connect_with_audio_node(&gain)?;
            gain.connect_with_audio_node(&ctx.destination())?;

            osc.start()?;
            osc.stop_with_when(now + duration)?;
            Ok(())
        })();
        if let Err(err) = played {
            log::warn!("audio cue failed: {:?}", err);
        }
    }
}

impl SoundPlayer for Rc<WebAudio> {
    fn play(&self, cue: SoundCue) {
        use OscillatorType::*;

        match cue {
            SoundCue::Spawn => self.tone(300.0, Sine, 0.1, 0.1),
            SoundCue::Move => self.tone(400.0, Triangle, 0.1, 0.05),
            SoundCue::Clear => {
                self.tone(600.0, Sine, 0.1, 0.1);
                let audio = Rc::clone(self);
                Timeout::new(100, move || audio.tone(800.0, Sine, 0.2, 0.1)).forget();
            }
            SoundCue::GameOver => {
                self.tone(300.0, Sawtooth, 0.3, 0.1);
                let audio = Rc::clone(self);
                Timeout::new(300, move || audio.tone(250.0, Sawtooth, 0.3, 0.1)).forget();
                let audio = Rc::clone(self);
                Timeout::new(600, move || audio.tone(200.0, Sawtooth, 0.5, 0.1)).forget();
            }
            SoundCue::Click => self.tone(800.0, Sine, 0.05, 0.05),
        }
    }
}
