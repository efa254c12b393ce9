use clap::Args;
use gloo::timers::callback::Timeout;
use memorito_core as game;
use yew::prelude::*;

use crate::board::{BoardView, CellMsg, CellPointerState, CellView, MouseButtons};
use crate::metrics::MetricsTable;
use crate::utils::{js_random_seed, parse_seed};

pub(crate) enum Msg {
    CellEvent(CellMsg),
    PreviewTick(game::PreviewToken),
    NewGame,
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    pub(crate) seed: Option<String>,

    /// Level of the first round
    #[arg(short, long)]
    pub(crate) level: Option<u8>,

    /// How many rounds a game lasts
    #[arg(short, long)]
    pub(crate) rounds: Option<u32>,

    /// Stop the game on the first mistake instead of retrying the level
    #[arg(long)]
    pub(crate) end_on_loss: bool,
}

impl GameProps {
    fn scoring_config(&self) -> game::ScoringConfig {
        let default = game::ScoringConfig::default();
        let on_loss = if self.end_on_loss {
            game::LossPolicy::EndGame
        } else {
            game::LossPolicy::RetryLevel
        };
        game::ScoringConfig::new(
            self.level.unwrap_or(default.starting_level),
            self.rounds.unwrap_or(default.max_rounds),
            on_loss,
        )
    }

    fn seed(&self) -> u64 {
        self.seed
            .as_deref()
            .map_or_else(js_random_seed, parse_seed)
    }
}

/// Press/release tracking for the board. A cell is selected like a DOM click: the left
/// button has to go down and come back up on the same cell.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct PointerTracker {
    current: Option<CellPointerState>,
    pressed_at: Option<game::CellIndex>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct PointerChange {
    redraw: bool,
    /// Set when the left button was released over the cell it went down on.
    selected: Option<CellPointerState>,
}

impl PointerTracker {
    fn handle(&mut self, msg: CellMsg) -> PointerChange {
        let pressed_before = self.pressed_cell();
        let mut selected = None;

        match msg {
            CellMsg::Press(state) => {
                self.pressed_at = (state.buttons == MouseButtons::LEFT).then_some(state.pos);
                self.current = Some(state);
            }
            CellMsg::Release(state) => {
                self.current = None;
                if !state.buttons.contains(MouseButtons::LEFT) {
                    selected = self
                        .pressed_at
                        .take()
                        .filter(|&pos| pos == state.pos)
                        .map(|_| state);
                }
            }
            CellMsg::Update(state) => {
                // the button came up somewhere off the board
                if !state.buttons.contains(MouseButtons::LEFT) {
                    self.pressed_at = None;
                }
                self.current = Some(state);
            }
            CellMsg::Leave => {
                self.current = None;
            }
        }

        PointerChange {
            redraw: selected.is_some() || pressed_before != self.pressed_cell(),
            selected,
        }
    }

    /// Cell showing as pressed: the one the press started on, while the left button is still
    /// held over it.
    fn pressed_cell(&self) -> Option<game::CellIndex> {
        self.current
            .filter(|state| state.buttons.contains(MouseButtons::LEFT))
            .map(|state| state.pos)
            .filter(|&pos| self.pressed_at == Some(pos))
    }

    fn is_pressed(&self, index: game::CellIndex) -> bool {
        self.pressed_cell() == Some(index)
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

pub(crate) struct GameView {
    controller: game::RoundController<game::RandomSequenceGenerator>,
    scoreboard: game::Scoreboard,
    pointer: PointerTracker,
    preview_timer: Option<Timeout>,
    seed: u64,
}

impl GameView {
    fn new_controller(seed: u64) -> game::RoundController<game::RandomSequenceGenerator> {
        log::info!("seed: {}", seed);
        game::RoundController::new(
            game::RandomSequenceGenerator::new(seed),
            game::PreviewTiming::default(),
        )
    }

    fn schedule(&mut self, ctx: &Context<Self>, tick: game::ScheduledTick) {
        let link = ctx.link().clone();
        let token = tick.token;
        // replacing the handle cancels whatever was pending
        self.preview_timer = Some(Timeout::new(tick.delay, move || {
            link.send_message(Msg::PreviewTick(token))
        }));
    }

    fn start_round(&mut self, ctx: &Context<Self>, level: game::Level) {
        self.pointer.clear();
        match self.controller.start(level) {
            Ok(tick) => self.schedule(ctx, tick),
            Err(err) => log::error!("could not start level {}: {}", level, err),
        }
    }

    fn advance_preview(&mut self, ctx: &Context<Self>, token: game::PreviewToken) -> bool {
        self.preview_timer = None;
        match self.controller.advance_preview(token) {
            Ok(game::PreviewAdvance::Continue(tick)) => {
                self.schedule(ctx, tick);
                true
            }
            Ok(game::PreviewAdvance::Finished) => true,
            Err(err) => {
                log::debug!("preview tick dropped: {}", err);
                false
            }
        }
    }

    fn select(&mut self, ctx: &Context<Self>, state: CellPointerState) -> bool {
        match self
            .controller
            .select(state.pos, state.time_stamp, &mut self.scoreboard)
        {
            Ok(outcome) => {
                log::debug!("select cell {}: {:?}", state.pos, outcome);
                if outcome.ends_round() {
                    self.follow_scoreboard(ctx);
                }
                outcome.has_update()
            }
            Err(err) => {
                log::debug!("selection of cell {} rejected: {}", state.pos, err);
                false
            }
        }
    }

    fn follow_scoreboard(&mut self, ctx: &Context<Self>) {
        match self.scoreboard.take_next_round() {
            Some(game::NextRound::Play(level)) => self.start_round(ctx, level),
            Some(game::NextRound::GameOver) => {
                self.preview_timer = None;
                self.controller.dispose();
                match serde_json::to_string(self.scoreboard.metrics()) {
                    Ok(json) => log::info!(
                        "game over after {} rounds: {}",
                        self.scoreboard.rounds_played(),
                        json
                    ),
                    Err(err) => log::warn!("could not serialize metrics: {}", err),
                }
            }
            None => {}
        }
    }

    fn new_game(&mut self, ctx: &Context<Self>) {
        self.preview_timer = None;
        self.controller.dispose();
        self.seed = js_random_seed();
        self.controller = Self::new_controller(self.seed);
        self.scoreboard.reset();
        self.start_round(ctx, self.scoreboard.level());
    }

    fn view_cells(&self, ctx: &Context<Self>, board: &game::Board) -> Html {
        let interactive = self.controller.phase().is_interactive();
        html! {
            <>
                {
                    for board.cells().iter().map(|cell| {
                        let index = cell.index();
                        let highlighted = cell.is_highlighted();
                        let callback = (interactive && cell.is_interactive())
                            .then(|| ctx.link().callback(Msg::CellEvent));
                        let pressed = callback.is_some() && self.pointer.is_pressed(index);
                        html! {
                            <CellView {index} {highlighted} {pressed} {callback}/>
                        }
                    })
                }
            </>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let seed = props.seed();
        let scoreboard = game::Scoreboard::new(props.scoring_config());
        let mut view = Self {
            controller: Self::new_controller(seed),
            pointer: PointerTracker::default(),
            preview_timer: None,
            seed,
            scoreboard,
        };
        view.start_round(ctx, view.scoreboard.level());
        view
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            CellEvent(cell_msg) => {
                log::trace!("cell event: {:?}", cell_msg);
                let change = self.pointer.handle(cell_msg);
                match change.selected {
                    Some(state) => self.select(ctx, state) || change.redraw,
                    None => change.redraw,
                }
            }
            PreviewTick(token) => self.advance_preview(ctx, token),
            NewGame => {
                self.new_game(ctx);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let game_over = self.scoreboard.is_game_over();
        let round = (self.scoreboard.rounds_played() + 1).min(self.scoreboard.config().max_rounds);
        let level = self
            .controller
            .level()
            .unwrap_or_else(|| self.scoreboard.level());
        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::NewGame
        });

        html! {
            <div class="memorito" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <nav>
                    <aside>{format!("Level {level}")}</aside>
                    <aside>{format!("Round {round}/{}", self.scoreboard.config().max_rounds)}</aside>
                </nav>
                {
                    match self.controller.board() {
                        Some(board) => html! {
                            <BoardView visible={board.is_visible()}>
                                {self.view_cells(ctx, board)}
                            </BoardView>
                        },
                        None => html! { <BoardView visible={false}/> },
                    }
                }
                if game_over {
                    <>
                        <MetricsTable metrics={self.scoreboard.metrics().to_vec()}/>
                        <button onclick={cb_new_game}>{"New game"}</button>
                    </>
                }
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.preview_timer = None;
        self.controller.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(index: u8) -> game::CellIndex {
        game::CellIndex::new(index).unwrap()
    }

    fn state(index: u8, buttons: MouseButtons, time_stamp: f64) -> CellPointerState {
        CellPointerState {
            pos: cell(index),
            buttons,
            time_stamp,
        }
    }

    fn press(index: u8, time_stamp: f64) -> CellMsg {
        CellMsg::Press(state(index, MouseButtons::LEFT, time_stamp))
    }

    fn release(index: u8, time_stamp: f64) -> CellMsg {
        CellMsg::Release(state(index, MouseButtons::empty(), time_stamp))
    }

    fn enter(index: u8, buttons: MouseButtons) -> CellMsg {
        CellMsg::Update(state(index, buttons, 0.0))
    }

    #[test]
    fn left_press_and_release_on_same_cell_selects() {
        let mut pointer = PointerTracker::default();

        let change = pointer.handle(press(4, 10.0));
        assert!(change.redraw);
        assert!(pointer.is_pressed(cell(4)));

        let change = pointer.handle(release(4, 25.0));
        assert!(change.redraw);
        let selected = change.selected.unwrap();
        assert_eq!(selected.pos, cell(4));
        assert_eq!(selected.time_stamp, 25.0);
        assert!(!pointer.is_pressed(cell(4)));
    }

    #[test]
    fn leaving_and_coming_back_keeps_the_press() {
        let mut pointer = PointerTracker::default();

        pointer.handle(press(1, 0.0));
        assert!(pointer.handle(CellMsg::Leave).redraw);
        assert!(!pointer.is_pressed(cell(1)));

        assert!(pointer.handle(enter(1, MouseButtons::LEFT)).redraw);
        assert!(pointer.is_pressed(cell(1)));

        let change = pointer.handle(release(1, 5.0));
        assert_eq!(change.selected.map(|state| state.pos), Some(cell(1)));
    }

    #[test]
    fn releasing_on_another_cell_selects_nothing() {
        let mut pointer = PointerTracker::default();

        pointer.handle(press(0, 0.0));
        pointer.handle(CellMsg::Leave);
        pointer.handle(enter(2, MouseButtons::LEFT));
        assert!(!pointer.is_pressed(cell(0)));
        assert!(!pointer.is_pressed(cell(2)));

        let change = pointer.handle(release(2, 4.0));
        assert_eq!(change.selected, None);

        pointer.handle(enter(0, MouseButtons::empty()));
        assert_eq!(pointer.handle(release(0, 6.0)).selected, None);
    }

    #[test]
    fn button_released_off_the_board_drops_the_press() {
        let mut pointer = PointerTracker::default();

        pointer.handle(press(5, 0.0));
        pointer.handle(CellMsg::Leave);
        pointer.handle(enter(5, MouseButtons::empty()));

        assert_eq!(pointer.handle(release(5, 9.0)), PointerChange::default());
    }

    #[test]
    fn other_buttons_never_select() {
        let mut pointer = PointerTracker::default();

        pointer.handle(CellMsg::Press(state(3, MouseButtons::RIGHT, 0.0)));
        assert!(!pointer.is_pressed(cell(3)));

        let change = pointer.handle(release(3, 1.0));
        assert_eq!(change.selected, None);
    }

    #[test]
    fn props_map_onto_scoring_config() {
        let props = GameProps {
            seed: Some("7".to_string()),
            level: Some(3),
            rounds: Some(0),
            end_on_loss: true,
        };
        let config = props.scoring_config();

        assert_eq!(config.starting_level, 3);
        assert_eq!(config.max_rounds, 1);
        assert_eq!(config.on_loss, game::LossPolicy::EndGame);
        assert_eq!(props.seed(), 7);
    }

    #[test]
    fn default_props_use_default_scoring() {
        let props = GameProps {
            seed: None,
            level: None,
            rounds: None,
            end_on_loss: false,
        };

        assert_eq!(props.scoring_config(), game::ScoringConfig::default());
    }
}
