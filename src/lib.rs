// Crate entry point. Declare and expose modules so tests and the binary can import them.
//
// Responsibilities
// - Only declare modules. No business logic here.

pub mod shared {
    pub mod core {
        pub mod primitives;
    }
    pub mod infrastructure {
        pub mod key_value_store;
    }
}

pub mod modules {
    pub mod drafts {
        pub mod core {
            pub mod branch;
            pub mod history;
            pub mod ports;
            pub mod save_gate;
            pub mod storage_key;
            pub mod version;
        }
        pub mod use_cases {
            pub mod capture_draft {
                pub mod agent;
                pub mod runner;
            }
            pub mod manage_drafts {
                pub mod copy_button;
                pub mod export;
                pub mod handler;
                pub mod view;
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod clipboard;
                pub mod file_editor;
                pub mod in_memory_editor;
                pub mod static_page;
            }
        }
    }
}

pub mod shell;
