use super::map_view::MapView;
use crate::config::ViewerConfig;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct AppProps {
    pub config: ViewerConfig,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    html! {
        <div class="App">
            <MapView config={props.config.clone()} />
        </div>
    }
}
