use gloo::timers::callback::{Interval, Timeout};
use std::rc::Rc;
use yew::prelude::*;

use kulki_core::{
    BallColor, ClickOutcome, Coord, Coord2, GameConfig, GameSession, MoveOutcome, MoveStart,
    SoundCue, SoundPlayer, SpawnOutcome,
};

use crate::audio::WebAudio;
use crate::utils::{js_random_seed, LocalScore, Settings};

/// Milliseconds per path cell while a ball is in flight.
const STEP_MS: u32 = 50;
/// Pause between a settled move and the forced spawn, for legibility.
const SPAWN_PAUSE_MS: u32 = 100;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellClick(Coord2),
    MoveTick,
    RunSpawn,
    NewGame,
    Undo,
    ToggleSound,
}

#[derive(Properties, Clone, PartialEq, Debug)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    pub seed: Option<u64>,
}

/// In-flight move animation: the ball slides one path cell per tick.
#[derive(Clone, Debug, PartialEq)]
struct MoveAnimation {
    start: MoveStart,
    step: usize,
}

impl MoveAnimation {
    fn position(&self) -> Coord2 {
        if self.step == 0 {
            self.start.from
        } else {
            self.start.path[self.step - 1]
        }
    }

    fn arrived(&self) -> bool {
        self.step >= self.start.path.len()
    }
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    x: Coord,
    y: Coord,
    ball: Option<BallColor>,
    hint: Option<BallColor>,
    #[prop_or_default]
    selected: bool,
    #[prop_or_default]
    in_flight: bool,
    callback: Callback<Coord2>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    let CellProps {
        x,
        y,
        ball,
        hint,
        selected,
        in_flight,
        callback,
    } = props.clone();

    let class = classes!("cell", selected.then_some("selected"));

    let onclick = Callback::from(move |_: MouseEvent| {
        callback.emit((x, y));
        log::trace!("({}, {}) clicked", x, y);
    });

    let contents = if let Some(color) = ball {
        html! { <i class={classes!("ball", color.as_str(), in_flight.then_some("flying"))}/> }
    } else if let Some(color) = hint {
        html! { <i class={classes!("hint", color.as_str())}/> }
    } else {
        Html::default()
    };

    html! {
        <td {class} {onclick}>{ contents }</td>
    }
}

pub(crate) struct GameView {
    session: GameSession<LocalScore, Rc<WebAudio>>,
    audio: Rc<WebAudio>,
    settings: Settings,
    anim: Option<MoveAnimation>,
    ticker: Option<Interval>,
    pause: Option<Timeout>,
}

impl GameView {
    fn begin_animation(&mut self, ctx: &Context<Self>, start: MoveStart) {
        self.anim = Some(MoveAnimation { start, step: 0 });
        let link = ctx.link().clone();
        self.ticker = Some(Interval::new(STEP_MS, move || {
            link.send_message(Msg::MoveTick)
        }));
    }

    fn advance_animation(&mut self, ctx: &Context<Self>) -> bool {
        let Some(anim) = &mut self.anim else {
            self.ticker = None;
            return false;
        };

        anim.step += 1;
        if !anim.arrived() {
            return true;
        }

        self.anim = None;
        self.ticker = None;
        match self.session.finish_move() {
            MoveOutcome::Cleared { points } => {
                log::debug!("cleared for {} points", points);
            }
            MoveOutcome::SpawnPending => {
                let link = ctx.link().clone();
                self.pause = Some(Timeout::new(SPAWN_PAUSE_MS, move || {
                    link.send_message(Msg::RunSpawn)
                }));
            }
            MoveOutcome::Ignored => {}
        }
        true
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let settings = Settings::local_or_default();
        let audio = WebAudio::new(settings.muted);
        let seed = ctx.props().seed.unwrap_or_else(js_random_seed);
        log::debug!("game seed: {}", seed);

        let mut session = GameSession::with_collaborators(
            GameConfig::default(),
            seed,
            LocalScore,
            Rc::clone(&audio),
        );
        session.start();

        Self {
            session,
            audio,
            settings,
            anim: None,
            ticker: None,
            pause: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::CellClick(coords) => match self.session.click(coords) {
                ClickOutcome::MoveStarted(start) => {
                    log::debug!("moving {:?} -> {:?}", start.from, start.to);
                    self.begin_animation(ctx, start);
                    true
                }
                ClickOutcome::Selected(coords) => {
                    log::trace!("selected {:?}", coords);
                    true
                }
                ClickOutcome::NoPath => {
                    log::debug!("no path to {:?}", coords);
                    false
                }
                ClickOutcome::Ignored => false,
            },
            Msg::MoveTick => self.advance_animation(ctx),
            Msg::RunSpawn => {
                self.pause = None;
                match self.session.resolve_spawn() {
                    SpawnOutcome::Ignored => false,
                    SpawnOutcome::Settled { spawned, points } => {
                        log::debug!("spawned {} balls for {} points", spawned.len(), points);
                        true
                    }
                    SpawnOutcome::GameOver {
                        final_score,
                        high_score,
                        ..
                    } => {
                        log::debug!("game over: {} (best {})", final_score, high_score);
                        true
                    }
                }
            }
            Msg::NewGame => {
                self.audio.play(SoundCue::Click);
                self.anim = None;
                self.ticker = None;
                self.pause = None;
                self.session.start();
                true
            }
            Msg::Undo => self.session.undo(),
            Msg::ToggleSound => {
                self.settings.muted = !self.settings.muted;
                self.audio.set_muted(self.settings.muted);
                self.settings.local_save();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let (cols, rows) = self.session.board().size();
        let selected = self.session.selected();
        let over = self.session.phase().is_over();
        let flying = self
            .anim
            .as_ref()
            .map(|anim| (anim.position(), anim.start.color, anim.start.from));

        let callback = ctx.link().callback(Msg::CellClick);
        let cb_new_game = ctx.link().callback(|_| Msg::NewGame);
        let cb_undo = ctx.link().callback(|_| Msg::Undo);
        let cb_sound = ctx.link().callback(|_| Msg::ToggleSound);

        html! {
            <div class="kulki">
                <nav>
                    <aside class="scores">
                        <span class="score">{ self.session.score() }</span>
                        <span class="best">{ self.session.high_score() }</span>
                    </aside>
                    <span class="preview">
                        { for self.session.preview_colors().iter().map(|color| html! {
                            <i class={classes!("ball", color.as_str())}/>
                        }) }
                    </span>
                    <aside class="controls">
                        <button onclick={cb_undo} disabled={!self.session.can_undo()}>{"undo"}</button>
                        <button onclick={cb_sound}>
                            { if self.audio.is_muted() { "sound: off" } else { "sound: on" } }
                        </button>
                        <button onclick={cb_new_game}>{"new game"}</button>
                    </aside>
                </nav>
                <table>
                    { for (0..rows).map(|y| html! {
                        <tr>
                            { for (0..cols).map(|x| {
                                let pos = (x, y);
                                let mut ball = self.session.board()[pos];
                                let mut in_flight = false;
                                if let Some((fly_pos, fly_color, fly_from)) = flying {
                                    if pos == fly_from {
                                        ball = None;
                                    }
                                    if pos == fly_pos {
                                        ball = Some(fly_color);
                                        in_flight = true;
                                    }
                                }
                                let hint = ball
                                    .is_none()
                                    .then(|| {
                                        self.session
                                            .hints()
                                            .iter()
                                            .find(|hint| hint.coords == pos)
                                            .map(|hint| hint.color)
                                    })
                                    .flatten();
                                html! {
                                    <CellView
                                        {x} {y}
                                        {ball} {hint} {in_flight}
                                        selected={selected == Some(pos)}
                                        callback={callback.clone()}
                                    />
                                }
                            }) }
                        </tr>
                    }) }
                </table>
                if over {
                    <dialog open={true} class="game-over">
                        <article>
                            <h2>{"Game over"}</h2>
                            <p>{"Score: "}{ self.session.score() }</p>
                            <p>{"Best: "}{ self.session.high_score() }</p>
                            <footer>
                                <button onclick={ctx.link().callback(|_| Msg::NewGame)}>
                                    {"play again"}
                                </button>
                            </footer>
                        </article>
                    </dialog>
                }
            </div>
        }
    }
}
