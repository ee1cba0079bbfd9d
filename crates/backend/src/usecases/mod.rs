pub mod u508_important_events;
