use bitflags::bitflags;
use memorito_core as game;
use serde::{Deserialize, Serialize};
use yew::prelude::*;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub(crate) struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct CellPointerState {
    pub pos: game::CellIndex,
    pub buttons: MouseButtons,
    pub time_stamp: game::Timestamp,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum CellMsg {
    Press(CellPointerState),
    Release(CellPointerState),
    /// Pointer entered the cell.
    Update(CellPointerState),
    Leave,
}

#[derive(Properties, PartialEq)]
pub(crate) struct BoardProps {
    pub visible: bool,
    #[prop_or_default]
    pub children: Html,
}

#[function_component]
pub(crate) fn BoardView(props: &BoardProps) -> Html {
    let class = classes!("grid-container", (!props.visible).then_some("hidden"));
    html! {
        <div {class}>{props.children.clone()}</div>
    }
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct CellProps {
    pub index: game::CellIndex,
    #[prop_or_default]
    pub highlighted: bool,
    #[prop_or_default]
    pub pressed: bool,
    /// Inert cells get no callback and ignore the pointer entirely.
    #[prop_or_default]
    pub callback: Option<Callback<CellMsg>>,
}

fn cell_classes(highlighted: bool, interactive: bool, pressed: bool) -> Classes {
    let mut class = classes!("grid-item");
    if interactive {
        class.push("hoverable");
    }
    if highlighted {
        class.push("active");
    }
    if pressed && interactive {
        class.push("pressed");
    }
    class
}

fn pointer_listener(
    callback: &Callback<CellMsg>,
    index: game::CellIndex,
    to_msg: fn(CellPointerState) -> CellMsg,
) -> Callback<MouseEvent> {
    let callback = callback.clone();
    Callback::from(move |e: MouseEvent| {
        let pointer_state = CellPointerState {
            pos: index,
            buttons: MouseButtons::from_bits_truncate(e.buttons()),
            time_stamp: e.time_stamp(),
        };
        let msg = to_msg(pointer_state);
        log::trace!("cell {}: {:?}", index, msg);
        callback.emit(msg);
    })
}

#[function_component]
pub(crate) fn CellView(props: &CellProps) -> Html {
    let CellProps {
        index,
        highlighted,
        pressed,
        callback,
    } = props.clone();

    let class = cell_classes(highlighted, callback.is_some(), pressed);
    let (x, y) = index.grid_position();
    let style = format!("grid-column: {}; grid-row: {};", x + 1, y + 1);

    let Some(callback) = callback else {
        return html! { <div {class} {style}/> };
    };

    let onmousedown = pointer_listener(&callback, index, CellMsg::Press);
    let onmouseup = pointer_listener(&callback, index, CellMsg::Release);
    let onmouseenter = pointer_listener(&callback, index, CellMsg::Update);
    let onmouseleave = Callback::from(move |e: MouseEvent| {
        let buttons = MouseButtons::from_bits_truncate(e.buttons());
        callback.emit(CellMsg::Leave);
        log::trace!("cell {} mouse leave ({:?})", index, buttons);
    });

    html! {
        <div {class} {style} {onmousedown} {onmouseup} {onmouseenter} {onmouseleave}/>
    }
}
