pub mod shared {
    pub mod infrastructure {
        pub mod change_feed;
        pub mod resource_store;
    }
}

pub mod modules {
    pub mod sync {
        pub mod core {
            pub mod config;
            pub mod events;
            pub mod resource;
            pub mod state;
            pub mod status;
        }
        pub mod use_cases {
            pub mod watch_resources {
                pub mod context;
                pub mod handle;
                pub mod poll;
                pub mod watcher;
            }
            pub mod manual_sync {
                pub mod dispatcher;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod receive_change {
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod sync_status {
                pub mod inbound {
                    pub mod http;
                }
            }
        }
    }
}

pub mod shell;
