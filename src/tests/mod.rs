mod list;
mod tagged;
