use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;
use yew::prelude::*;

use crate::config::{load_help_visible, store_help_visible};
use crate::model::{ArrowKeys, ArrowKeysAction, Direction};
use crate::theme;

#[derive(Properties, PartialEq, Clone)]
pub struct MovementPanelProps {
    /// Fired when an on-screen arrow is clicked.
    pub on_arrow: Callback<Direction>,
    #[prop_or(false)]
    pub initial_help: bool,
}

fn arrow_rotation(dir: Direction) -> &'static str {
    match dir {
        Direction::Up => "0deg",
        Direction::Left => "-90deg",
        Direction::Right => "90deg",
        Direction::Down => "180deg",
    }
}

fn help_label_position(dir: Direction) -> &'static str {
    match dir {
        Direction::Up => "top:-45px;",
        Direction::Left => "left:-70px; top:10px;",
        Direction::Right => "right:-75px; top:10px;",
        Direction::Down => "top:70px;",
    }
}

/// Arrow pad that lights up held arrow keys, with a toggleable key legend.
#[function_component(MovementPanel)]
pub fn movement_panel(props: &MovementPanelProps) -> Html {
    let keys = use_reducer(ArrowKeys::default);
    let help = {
        let initial = props.initial_help;
        use_state(move || load_help_visible(initial))
    };

    // Key listeners feed display state only
    {
        let keys = keys.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window();
            let document = window.as_ref().and_then(|w| w.document());
            let keydown_cb = {
                let keys = keys.clone();
                Closure::wrap(Box::new(move |e: KeyboardEvent| {
                    keys.dispatch(ArrowKeysAction::KeyDown(e.key()));
                }) as Box<dyn FnMut(_)>)
            };
            let keyup_cb = {
                let keys = keys.clone();
                Closure::wrap(Box::new(move |e: KeyboardEvent| {
                    keys.dispatch(ArrowKeysAction::KeyUp(e.key()));
                }) as Box<dyn FnMut(_)>)
            };
            let blur_cb = {
                let keys = keys.clone();
                Closure::wrap(Box::new(move || {
                    keys.dispatch(ArrowKeysAction::ReleaseAll);
                }) as Box<dyn FnMut()>)
            };
            if let Some(doc) = &document {
                let _ = doc
                    .add_event_listener_with_callback("keydown", keydown_cb.as_ref().unchecked_ref());
                let _ =
                    doc.add_event_listener_with_callback("keyup", keyup_cb.as_ref().unchecked_ref());
            }
            if let Some(win) = &window {
                let _ = win.add_event_listener_with_callback("blur", blur_cb.as_ref().unchecked_ref());
            }
            move || {
                if let Some(doc) = &document {
                    let _ = doc.remove_event_listener_with_callback(
                        "keydown",
                        keydown_cb.as_ref().unchecked_ref(),
                    );
                    let _ = doc.remove_event_listener_with_callback(
                        "keyup",
                        keyup_cb.as_ref().unchecked_ref(),
                    );
                }
                if let Some(win) = &window {
                    let _ = win
                        .remove_event_listener_with_callback("blur", blur_cb.as_ref().unchecked_ref());
                }
                let _keep_alive = (&keydown_cb, &keyup_cb, &blur_cb);
            }
        });
    }
    // Persist help toggle
    {
        let flag = *help;
        use_effect_with(flag, move |_| {
            store_help_visible(flag);
            || ()
        });
    }

    let toggle_help = {
        let help = help.clone();
        Callback::from(move |_| help.set(!*help))
    };
    let arrow = |dir: Direction| {
        let cb = props.on_arrow.clone();
        let onclick = Callback::from(move |_| cb.emit(dir));
        let style = format!(
            "{} transform:scale(1.6) rotate({}); color:{};",
            theme::ICON_BUTTON,
            arrow_rotation(dir),
            theme::arrow_color(keys.is_held(dir))
        );
        html! { <div><button {style} aria-label={dir.key()} {onclick}>{"▲"}</button></div> }
    };
    let label = |dir: Direction| {
        if *help {
            html! { <p style={format!("{} {}", theme::HELP_LABEL, help_label_position(dir))}>{ dir.help_label() }</p> }
        } else {
            html! {}
        }
    };

    html! {<div style="display:flex; flex-direction:column; justify-content:space-around; align-items:center; position:relative; box-shadow:0px 0px 5px 3px rgba(0,0,0,0.75); border-radius:5px;">
        { label(Direction::Up) }
        { arrow(Direction::Up) }
        <div style="width:100%; display:flex; justify-content:space-around;">
            { label(Direction::Left) }
            { arrow(Direction::Left) }
            { label(Direction::Right) }
            { arrow(Direction::Right) }
        </div>
        { arrow(Direction::Down) }
        { label(Direction::Down) }
        <button
            style={format!("{} position:absolute; bottom:-4px; right:-4px; font-size:14px; color:{};", theme::ICON_BUTTON, theme::arrow_color(*help))}
            aria-label="Help"
            onclick={toggle_help}
        >{"?"}</button>
    </div>}
}
