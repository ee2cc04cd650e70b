pub mod boxcutter;
