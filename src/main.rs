mod animator;
mod capabilities;
mod carousel;
mod contact;
mod counters;
mod cursor;
mod dev_reload;
mod dom;
mod http;
mod media;
mod observer;
mod portfolio;
mod reveal;
mod script_loader;
mod site;
mod tilt;

fn main() {
    console_error_panic_hook::set_once();
    site::start();
}
