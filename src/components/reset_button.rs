use yew::prelude::*;

use crate::theme;

#[derive(Properties, PartialEq, Clone)]
pub struct ResetButtonProps {
    pub on_reset: Callback<()>,
}

#[function_component(ResetButton)]
pub fn reset_button(props: &ResetButtonProps) -> Html {
    let hovered = use_state(|| false);
    let reset = {
        let cb = props.on_reset.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let enter = {
        let hovered = hovered.clone();
        Callback::from(move |_| hovered.set(true))
    };
    let leave = {
        let hovered = hovered.clone();
        Callback::from(move |_| hovered.set(false))
    };
    html! {<div style={format!("{} top:50px; left:80px; cursor:pointer;", theme::PANEL)}>
        <div style="position:relative; display:flex; justify-content:flex-start; align-items:center;">
            <button
                style={theme::ICON_BUTTON}
                aria-label="Reset Camera"
                onclick={reset}
                onmouseenter={enter}
                onmouseleave={leave}
            >{"⌖"}</button>
            { if *hovered { html!{ <div role="tooltip" style={theme::TOOLTIP}>{"Reset Camera"}</div> } } else { html!{} } }
        </div>
    </div>}
}
