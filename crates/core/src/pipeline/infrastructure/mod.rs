pub mod threaded_folder_executor;
