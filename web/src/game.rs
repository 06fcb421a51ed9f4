use core::time::Duration;

use gloo::timers::callback::{Interval, Timeout};
use memorito_core as game;
use memorito_core::{Scheduler, TimerEvent};
use web_time::Instant;
use yew::html::Scope;
use yew::prelude::*;

use crate::settings::Settings;
use crate::utils::*;

/// Clock/scheduler capability for the engine, backed by the browser's timers.
///
/// Scheduled timers send messages back through the component link; the
/// component forwards them into the engine, so every engine mutation still
/// happens on the single UI thread. Dropping a `Timeout`/`Interval` handle
/// cancels it.
pub(crate) struct LinkScheduler {
    link: Scope<GameView>,
    origin: Instant,
}

impl LinkScheduler {
    fn new(link: Scope<GameView>) -> Self {
        Self {
            link,
            origin: Instant::now(),
        }
    }
}

impl Scheduler for LinkScheduler {
    type OneShot = Timeout;
    type Repeating = Interval;

    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn once(&mut self, delay: Duration, event: TimerEvent) -> Timeout {
        let link = self.link.clone();
        Timeout::new(delay.as_millis() as u32, move || {
            link.send_message(Msg::Timer(event))
        })
    }

    fn repeating(&mut self, period: Duration, event: TimerEvent) -> Interval {
        let link = self.link.clone();
        Interval::new(period.as_millis() as u32, move || {
            link.send_message(Msg::Timer(event))
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Timer(TimerEvent),
    TileClicked(game::TileId),
    Start,
    Stop,
    NextLevel,
    DifficultyChanged(game::Side),
}

#[derive(Properties, Clone, Debug, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[prop_or_default]
    pub(crate) seed: Option<String>,
}

fn parse_seed(seed: Option<&str>) -> Option<u64> {
    seed.and_then(|text| text.parse().ok())
}

fn face_classes(face: game::TileFace) -> Classes {
    use game::TileFace::*;
    classes!(
        "tile",
        match face {
            Concealed => classes!(),
            Exposed => classes!("target"),
            Hit => classes!("hit"),
            Miss => classes!("miss"),
        }
    )
}

#[derive(Properties, Clone, PartialEq)]
struct TileProps {
    id: game::TileId,
    face: game::TileFace,
    callback: Callback<game::TileId>,
}

#[function_component(TileView)]
fn tile_component(props: &TileProps) -> Html {
    let TileProps { id, face, callback } = props.clone();
    let class = face_classes(face);

    let onclick = Callback::from(move |_: MouseEvent| {
        callback.emit(id);
        log::trace!("tile {} clicked", id.raw());
    });

    html! {
        <td {class} {onclick}/>
    }
}

pub(crate) struct GameView {
    engine: game::RoundEngine<LinkScheduler>,
    prev_time: u32,
}

impl GameView {
    fn controls(&self, ctx: &Context<Self>) -> Html {
        use game::Phase::*;

        let cb_start = ctx.link().callback(|_| Msg::Start);
        let cb_stop = ctx.link().callback(|_| Msg::Stop);
        let cb_next = ctx.link().callback(|_| Msg::NextLevel);

        match self.engine.phase() {
            Idle => html! { <button onclick={cb_start}>{"Play"}</button> },
            Previewing => html! { <button disabled=true>{"Memorize…"}</button> },
            Active => html! { <button onclick={cb_stop}>{"Give up"}</button> },
            Ended => html! {
                <>
                    <button onclick={cb_start}>{"Replay"}</button>
                    <button onclick={cb_next}>{"Next level"}</button>
                </>
            },
        }
    }

    fn difficulty_slider(&self, ctx: &Context<Self>) -> Html {
        let difficulty = self.engine.difficulty();
        let oninput = ctx.link().callback(|e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            Msg::DifficultyChanged(
                input
                    .value()
                    .parse()
                    .unwrap_or(game::RoundConfig::MIN_DIFFICULTY),
            )
        });

        html! {
            <div>
                <label for="difficulty">{format!("Difficulty: {}", difficulty)}</label>
                <input
                    id="difficulty"
                    type="range"
                    min={game::RoundConfig::MIN_DIFFICULTY.to_string()}
                    max={game::RoundConfig::MAX_DIFFICULTY.to_string()}
                    value={difficulty.to_string()}
                    {oninput}
                />
            </div>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let settings: Settings = LocalOrDefault::local_or_default();
        let seed = parse_seed(ctx.props().seed.as_deref()).unwrap_or_else(js_random_seed);
        log::debug!("seed: {}", seed);

        let engine = game::RoundEngine::with_config(
            LinkScheduler::new(ctx.link().clone()),
            Box::new(game::RandomTargetPicker::new(seed)),
            game::RoundConfig::new(settings.difficulty),
        );

        Self {
            engine,
            prev_time: 0,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Timer(event) => {
                self.engine.handle_timer(event);
                match event {
                    // only redraw when the displayed time actually changed
                    TimerEvent::Tick => {
                        let time = self.engine.elapsed_secs();
                        if self.prev_time != time {
                            self.prev_time = time;
                            true
                        } else {
                            false
                        }
                    }
                    TimerEvent::PreviewElapsed => true,
                }
            }
            Msg::TileClicked(id) => {
                log::debug!("click tile: {:?}", id);
                self.engine.click_tile(id).has_update()
            }
            Msg::Start => self.engine.start_round().has_update(),
            Msg::Stop => self.engine.end_round().has_update(),
            Msg::NextLevel => self.engine.next_level().has_update(),
            Msg::DifficultyChanged(difficulty) => {
                self.engine.set_difficulty(difficulty);
                Settings {
                    difficulty: self.engine.difficulty(),
                }
                .local_save();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let side = usize::from(self.engine.difficulty());
        let hits = format_for_counter(u32::from(self.engine.hit_count()));
        let misses = format_for_counter(u32::from(self.engine.miss_count()));
        let elapsed = format_for_counter(self.engine.elapsed_secs());
        let callback = ctx.link().callback(Msg::TileClicked);

        html! {
            <div class="memorito">
                <h1>{"Memorito"}</h1>
                { self.difficulty_slider(ctx) }
                <nav>
                    <aside>{hits}</aside>
                    <span>{ self.controls(ctx) }</span>
                    <aside>{elapsed}</aside>
                    <aside>{misses}</aside>
                </nav>
                <p>{ self.engine.message() }</p>
                <table>
                    {
                        for self.engine.tiles().chunks(side).map(|row| html! {
                            <tr>
                                {
                                    for row.iter().map(|tile| {
                                        let face = self.engine.face_of(tile);
                                        html! {
                                            <TileView
                                                key={tile.id().raw()}
                                                id={tile.id()}
                                                {face}
                                                callback={callback.clone()}
                                            />
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faces_map_to_the_expected_classes() {
        use game::TileFace::*;

        assert_eq!(face_classes(Concealed), classes!("tile"));
        assert_eq!(face_classes(Exposed), classes!("tile", "target"));
        assert_eq!(face_classes(Hit), classes!("tile", "hit"));
        assert_eq!(face_classes(Miss), classes!("tile", "miss"));
    }

    #[test]
    fn seed_override_parses_decimal_or_falls_back() {
        assert_eq!(parse_seed(Some("12345")), Some(12345));
        assert_eq!(parse_seed(Some("not-a-seed")), None);
        assert_eq!(parse_seed(None), None);
    }
}
