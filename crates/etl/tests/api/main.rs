mod etl_workflow;
mod helpers;
